pub mod cli;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod io;
pub mod sticker;

pub use error::{Result, StickerError};
