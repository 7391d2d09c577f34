use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Stickerbook: find, add and rename stickers by abbreviated name
#[derive(Parser)]
#[command(name = "stickerbook")]
#[command(version)]
#[command(about = "Find, add and rename stickers by abbreviated name")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sticker root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Set log level
    #[arg(long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,
}

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stickers matching any group of patterns (groups separated by `/`)
    List {
        patterns: Vec<String>,
    },

    /// Download the image at URL and save it as a new sticker
    Add {
        name: String,
        url: String,
    },

    /// Add a new plain-text sticker
    AddText {
        name: String,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Rename the sticker matching NAME to NEW_NAME
    Rename {
        name: String,
        new_name: String,
    },

    /// Post a random sticker among the matches
    Random {
        patterns: Vec<String>,
    },

    /// Post the one sticker matching all patterns
    Post {
        #[arg(required = true)]
        patterns: Vec<String>,
    },
}

impl Commands {
    /// Get the command name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Commands::List { .. } => "list",
            Commands::Add { .. } => "add",
            Commands::AddText { .. } => "add-text",
            Commands::Rename { .. } => "rename",
            Commands::Random { .. } => "random",
            Commands::Post { .. } => "post",
        }
    }

    /// Check if this command modifies the catalog
    pub fn modifies_files(&self) -> bool {
        matches!(
            self,
            Commands::Add { .. } | Commands::AddText { .. } | Commands::Rename { .. }
        )
    }
}
