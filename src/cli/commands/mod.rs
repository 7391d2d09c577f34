pub mod add;
pub mod list;
pub mod post;
pub mod rename;

use async_trait::async_trait;

use super::app::Commands;
use crate::sticker::{Fetcher, StickerManager};
use crate::Result;

/// What every command runs against
pub struct CommandContext {
    pub manager: StickerManager,
    pub fetcher: Box<dyn Fetcher>,
}

/// Common trait for all command handlers
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Execute the command
    async fn execute(&self, context: &CommandContext) -> Result<()>;

    /// Get command name for logging
    fn name(&self) -> &'static str;
}

impl Commands {
    /// Build the handler for this command
    pub fn into_handler(self) -> Box<dyn CommandHandler> {
        match self {
            Commands::List { patterns } => Box::new(list::ListCommand::new(patterns)),
            Commands::Add { name, url } => Box::new(add::AddCommand::new(name, url)),
            Commands::AddText { name, text } => {
                Box::new(add::AddTextCommand::new(name, text.join(" ")))
            }
            Commands::Rename { name, new_name } => {
                Box::new(rename::RenameCommand::new(name, new_name))
            }
            Commands::Random { patterns } => Box::new(post::RandomCommand::new(patterns)),
            Commands::Post { patterns } => Box::new(post::PostCommand::new(patterns)),
        }
    }
}
