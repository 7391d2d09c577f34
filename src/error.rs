use std::path::PathBuf;
use thiserror::Error;

/// Message shown to users in place of any internal error.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something goes wrong here! Please contact the admin.";

#[derive(Error, Debug)]
pub enum StickerError {
    #[error("Invalid sticker name, it must not be empty")]
    EmptyName,

    #[error("Invalid sticker name, filepath separator ({0}) or slash is included")]
    InvalidName(char),

    #[error("Invalid sticker name, `{0}` cannot be used as a file name")]
    ReservedName(String),

    #[error("The name is contained by the following sticker(s): {0}")]
    ContainedBy(String),

    #[error("The name contains the following sticker(s): {0}")]
    Contains(String),

    #[error("The name is already taken by an existing file")]
    Occupied,

    #[error("Sticker not found.")]
    NotFound,

    #[error("Found more than one stickers. Matched: {0}")]
    Ambiguous(String),

    #[error("Invalid URL content type. Only png, jpeg, and gif are supported.")]
    UnsupportedContentType(Option<String>),

    #[error("Invalid Content-Length from the URL. Is it a valid URL?")]
    InvalidContentLength,

    #[error("Image size too large. Expect < {limit}B, got {actual}")]
    TooLarge { limit: u64, actual: u64 },

    #[error("Failed to download the image. Is it a valid URL?")]
    FetchFailed,

    #[error("The text must not be empty")]
    EmptyText,

    #[error("{0}")]
    Usage(String),

    /// Opaque internal failure. Detail is logged where it happens.
    #[error("Error uninformable to user")]
    Internal,

    #[error("Sticker root is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("Failed to walk the sticker root: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Sticker name {name:?} is derived from both {} and {}", .first.display(), .second.display())]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StickerError {
    /// Whether the message is safe and useful to show to the requesting user.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            StickerError::Internal
                | StickerError::RootNotDirectory(_)
                | StickerError::Walk(_)
                | StickerError::DuplicateName { .. }
                | StickerError::Io(_)
                | StickerError::Config(_)
        )
    }

    /// The text to send back to the user.
    ///
    /// Internal errors collapse into a generic apology so paths and
    /// system detail never leave the process.
    pub fn user_message(&self) -> String {
        if self.is_user_facing() {
            self.to_string()
        } else {
            GENERIC_FAILURE_MESSAGE.to_string()
        }
    }
}

pub type Result<T> = std::result::Result<T, StickerError>;
