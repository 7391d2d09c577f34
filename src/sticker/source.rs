//! Content kinds and remote byte sources for new stickers

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;

/// Largest payload accepted for a new sticker, in bytes
pub const DEFAULT_SIZE_LIMIT: u64 = 3_500_000;

/// The kinds of content a sticker file may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Png,
    Jpeg,
    Gif,
    Text,
}

impl ContentKind {
    /// Parse a MIME type, ignoring parameters such as `charset`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some(ContentKind::Png),
            "image/jpeg" => Some(ContentKind::Jpeg),
            "image/gif" => Some(ContentKind::Gif),
            "text/plain" => Some(ContentKind::Text),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ContentKind::Png => "png",
            ContentKind::Jpeg => "jpeg",
            ContentKind::Gif => "gif",
            ContentKind::Text => "txt",
        }
    }

    pub fn is_image(&self) -> bool {
        !matches!(self, ContentKind::Text)
    }
}

/// A download that grew past the size limit before it finished.
///
/// Returned inside the `anyhow::Error` of [`Fetcher::fetch`] so callers can
/// tell it apart from transport failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Body exceeds {limit} bytes, received {received}")]
pub struct BodyTooLarge {
    pub limit: u64,
    pub received: u64,
}

/// Append `chunk` to `body` unless that would take it past `limit`.
pub fn append_limited(body: &mut Vec<u8>, chunk: &[u8], limit: u64) -> Result<(), BodyTooLarge> {
    let received = (body.len() + chunk.len()) as u64;
    if received > limit {
        return Err(BodyTooLarge { limit, received });
    }
    body.extend_from_slice(chunk);
    Ok(())
}

/// What a HEAD request reveals about a source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Probe {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

/// Remote source of sticker bytes
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Inspect the source without downloading the body
    async fn probe(&self, url: &str) -> Result<Probe>;

    /// Download the full body, giving up with [`BodyTooLarge`] as soon as
    /// more than `limit` bytes arrive
    async fn fetch(&self, url: &str, limit: u64) -> Result<Vec<u8>>;
}

/// [`Fetcher`] over HTTP
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("stickerbook")
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn probe(&self, url: &str) -> Result<Probe> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .with_context(|| format!("Failed to HEAD {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("HEAD failed: HTTP {} for {}", response.status(), url);
        }

        let headers = response.headers();
        let content_type = headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = headers
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());

        Ok(Probe {
            content_type,
            content_length,
        })
    }

    async fn fetch(&self, url: &str, limit: u64) -> Result<Vec<u8>> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to GET {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Download failed: HTTP {} for {}", response.status(), url);
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read download response")?
        {
            append_limited(&mut body, &chunk, limit)?;
        }
        Ok(body)
    }
}
