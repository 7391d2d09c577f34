use anyhow::{Context, Result};
use clap::Parser;
use stickerbook::{
    cli::{commands::CommandContext, Cli, LogLevel},
    config::ConfigLoader,
    io::StickerPaths,
    sticker::{HttpFetcher, StickerManager},
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn initialize_tracing(log_level: &LogLevel) {
    // RUST_LOG wins over the flag when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // stdout carries command output
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_level);

    let paths = StickerPaths::default();
    let config_file = cli.config.unwrap_or_else(|| paths.config_file());
    let config = ConfigLoader::load(&config_file)
        .with_context(|| format!("Failed to load config from {}", config_file.display()))?;

    let root = cli.root.unwrap_or(paths.resource_dir);
    let manager = StickerManager::load(&root, config.catalog_options())
        .with_context(|| format!("Failed to load stickers from {}", root.display()))?;

    let context = CommandContext {
        manager,
        fetcher: Box::new(HttpFetcher::new()?),
    };

    if cli.command.modifies_files() {
        debug!("Command {} writes under {:?}", cli.command.name(), root);
    }
    let handler = cli.command.into_handler();
    debug!("Running command: {}", handler.name());
    if let Err(e) = handler.execute(&context).await {
        if !e.is_user_facing() {
            error!("Command {} failed: {}", handler.name(), e);
        }
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}
