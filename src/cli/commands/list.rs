use async_trait::async_trait;

use super::{CommandContext, CommandHandler};
use crate::cli::patterns::build_pattern_groups;
use crate::Result;

/// Handler for the `list` command
pub struct ListCommand {
    pub patterns: Vec<String>,
}

#[async_trait]
impl CommandHandler for ListCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let catalog = context.manager.read().await;
        let matched = catalog.matched(&build_pattern_groups(&self.patterns));

        if matched.is_empty() {
            println!("No matched stickers found!");
            return Ok(());
        }

        for line in catalog.hinted_names(&matched) {
            println!("{line}");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "list"
    }
}

impl ListCommand {
    /// Create new list command
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }
}
