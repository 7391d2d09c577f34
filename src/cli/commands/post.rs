use async_trait::async_trait;
use tracing::error;

use super::{CommandContext, CommandHandler};
use crate::cli::patterns::build_pattern_groups;
use crate::sticker::Sticker;
use crate::{Result, StickerError};

/// Print a sticker: the text itself for text stickers, otherwise the path
/// of the image to upload.
///
/// Callers hold the read guard so the file cannot be renamed away between
/// lookup and read.
fn show(sticker: &Sticker) -> Result<()> {
    if sticker.is_text() {
        let text = std::fs::read_to_string(sticker.path()).map_err(|e| {
            error!("Failed to read the text {:?}: {}", sticker.path(), e);
            StickerError::Internal
        })?;
        println!("{text}");
    } else {
        println!("{}", sticker.path().display());
    }
    Ok(())
}

/// Handler for the `post` command
pub struct PostCommand {
    pub patterns: Vec<String>,
}

#[async_trait]
impl CommandHandler for PostCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let groups = build_pattern_groups(&self.patterns);
        let [patterns] = groups.as_slice() else {
            return Err(StickerError::Usage(
                "Post command should not contain slash (`/`).".to_string(),
            ));
        };

        let catalog = context.manager.read().await;
        show(catalog.resolve(patterns.as_slice())?)
    }

    fn name(&self) -> &'static str {
        "post"
    }
}

impl PostCommand {
    /// Create new post command
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }
}

/// Handler for the `random` command
pub struct RandomCommand {
    pub patterns: Vec<String>,
}

#[async_trait]
impl CommandHandler for RandomCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let catalog = context.manager.read().await;
        match catalog.random(&build_pattern_groups(&self.patterns)) {
            Some(sticker) => show(sticker),
            None => {
                println!(
                    "Cannot find any matched sticker. Find the sticker names with `list` command."
                );
                Ok(())
            }
        }
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

impl RandomCommand {
    /// Create new random command
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }
}
