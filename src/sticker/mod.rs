//! Sticker catalog: naming, indexing, lookup and mutation
//!
//! ```text
//! StickerManager          ← shared / exclusive guards
//!     │
//!     ▼
//! Catalog                 ← load, match, add, rename
//!     ├── StickerIndex    ← entries sorted by name
//!     ├── hint            ← unique-prefix lengths
//!     └── Fetcher         ← remote bytes for new stickers
//! ```

pub mod catalog;
pub mod hint;
pub mod index;
pub mod manager;
pub mod source;

pub use catalog::{Catalog, CatalogOptions, NAME_JOINER};
pub use hint::{unique_prefix_lengths, with_hint, ConflictingNames};
pub use index::{Sticker, StickerIndex};
pub use manager::StickerManager;
pub use source::{
    append_limited, BodyTooLarge, ContentKind, Fetcher, HttpFetcher, Probe, DEFAULT_SIZE_LIMIT,
};
