use async_trait::async_trait;

use super::{CommandContext, CommandHandler};
use crate::Result;

/// Handler for the `rename` command
pub struct RenameCommand {
    pub name: String,
    pub new_name: String,
}

#[async_trait]
impl CommandHandler for RenameCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let mut catalog = context.manager.write().await;
        catalog.rename_sticker(&self.name, &self.new_name)?;

        println!("Done. Renamed sticker: `{}` -> `{}`", self.name, self.new_name);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "rename"
    }
}

impl RenameCommand {
    /// Create new rename command
    pub fn new(name: String, new_name: String) -> Self {
        Self { name, new_name }
    }
}
