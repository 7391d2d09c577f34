use async_trait::async_trait;

use super::{CommandContext, CommandHandler};
use crate::Result;

/// Handler for the `add` command
pub struct AddCommand {
    pub name: String,
    pub url: String,
}

#[async_trait]
impl CommandHandler for AddCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        // Held across the download so no reader sees a half-added sticker
        let mut catalog = context.manager.write().await;
        catalog
            .add_sticker(&self.name, &self.url, context.fetcher.as_ref())
            .await?;

        println!("Done. Added sticker: `{}`", self.name);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "add"
    }
}

impl AddCommand {
    /// Create new add command
    pub fn new(name: String, url: String) -> Self {
        Self { name, url }
    }
}

/// Handler for the `add-text` command
pub struct AddTextCommand {
    pub name: String,
    pub text: String,
}

#[async_trait]
impl CommandHandler for AddTextCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let mut catalog = context.manager.write().await;
        catalog.add_text(&self.name, self.text.trim())?;

        println!("Done. Added text: `{}`", self.name);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "add-text"
    }
}

impl AddTextCommand {
    /// Create new add-text command
    pub fn new(name: String, text: String) -> Self {
        Self { name, text }
    }
}
