use crate::{Result, StickerError};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Default locations of the config file and the sticker root
#[derive(Debug, Clone)]
pub struct StickerPaths {
    /// Configuration directory
    pub config_dir: PathBuf,
    /// Default sticker root (resources/)
    pub resource_dir: PathBuf,
}

impl StickerPaths {
    /// Create new paths instance using standard directories
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "stickerbook").ok_or_else(|| {
            StickerError::Config("Failed to determine project directories".to_string())
        })?;

        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            resource_dir: dirs.data_dir().join("resources"),
        })
    }

    /// Paths relative to a working directory: `./config.json` and
    /// `./resources`
    pub fn for_dir(base: &Path) -> Self {
        Self {
            config_dir: base.to_path_buf(),
            resource_dir: base.join("resources"),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}

impl Default for StickerPaths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if platform directories fail
            let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Self::for_dir(&current_dir)
        })
    }
}
