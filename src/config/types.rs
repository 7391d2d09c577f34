use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::cooldown::{CooldownPolicy, GuildCooldown};
use crate::sticker::{CatalogOptions, DEFAULT_SIZE_LIMIT};

fn default_cool_down() -> u64 {
    5
}

fn default_cool_down_message() -> String {
    "Cooling down...".to_string()
}

fn default_size_limit() -> u64 {
    DEFAULT_SIZE_LIMIT
}

/// Root configuration file structure (config.json)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct StickerConfig {
    /// Match names case-sensitively
    #[serde(default)]
    pub case_sensitive: bool,

    /// Default per-channel cooldown in seconds; zero disables it
    #[serde(default = "default_cool_down")]
    pub cool_down: u64,

    /// Reply sent while a channel is cooling down
    #[serde(default = "default_cool_down_message")]
    pub cool_down_message: String,

    /// Overrides for specific guilds
    #[serde(default)]
    pub per_guild_config: Vec<GuildConfig>,

    /// Largest accepted sticker payload in bytes
    #[serde(default = "default_size_limit")]
    pub size_limit: u64,
}

/// Cooldown override for one guild
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct GuildConfig {
    #[serde(rename = "GuildID")]
    pub guild_id: String,

    #[serde(default)]
    pub cool_down: u64,

    #[serde(default = "default_cool_down_message")]
    pub cool_down_message: String,
}

impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            cool_down: default_cool_down(),
            cool_down_message: default_cool_down_message(),
            per_guild_config: Vec::new(),
            size_limit: default_size_limit(),
        }
    }
}

impl StickerConfig {
    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions::new()
            .with_case_sensitive(self.case_sensitive)
            .with_size_limit(self.size_limit)
    }

    pub fn cooldown_policy(&self) -> CooldownPolicy {
        let per_guild: HashMap<String, GuildCooldown> = self
            .per_guild_config
            .iter()
            .map(|g| {
                (
                    g.guild_id.clone(),
                    GuildCooldown {
                        duration: Duration::from_secs(g.cool_down),
                        message: g.cool_down_message.clone(),
                    },
                )
            })
            .collect();

        CooldownPolicy::new(
            GuildCooldown {
                duration: Duration::from_secs(self.cool_down),
                message: self.cool_down_message.clone(),
            },
            per_guild,
        )
    }
}
