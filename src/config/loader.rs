use super::types::StickerConfig;
use crate::{Result, StickerError};
use std::path::Path;
use tracing::{debug, info};

/// Loads [`StickerConfig`] from a JSON file
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the configuration at `path`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one
    /// is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<StickerConfig> {
        let path = path.as_ref();

        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(StickerConfig::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            StickerError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: StickerConfig = serde_json::from_str(&contents).map_err(|e| {
            StickerError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
