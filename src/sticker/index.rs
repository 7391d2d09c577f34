//! Sorted in-memory storage of sticker entries

use std::path::{Path, PathBuf};
use tracing::warn;

/// One named sticker and the file backing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sticker {
    name: String,
    path: PathBuf,
}

impl Sticker {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File extension without the leading dot, e.g. `png` or `txt`
    pub fn ext(&self) -> &str {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
    }

    /// Whether the sticker is a plain-text entry
    pub fn is_text(&self) -> bool {
        self.ext() == "txt"
    }
}

/// Entries kept sorted by name using byte-wise comparison.
///
/// The index performs no locking of its own; it lives inside a
/// [`super::Catalog`] and is only touched through the manager's lock.
#[derive(Debug, Default, Clone)]
pub struct StickerIndex {
    entries: Vec<Sticker>,
}

impl StickerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from unsorted entries. Duplicate names are dropped
    /// with a warning, keeping the first.
    pub fn from_unsorted(mut entries: Vec<Sticker>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries.dedup_by(|later, earlier| {
            let duplicate = later.name == earlier.name;
            if duplicate {
                warn!("Dropping duplicate sticker {:?} at {:?}", later.name, later.path);
            }
            duplicate
        });
        Self { entries }
    }

    /// Binary search by name: `Ok(position)` when found, otherwise
    /// `Err(position)` where the name would be inserted.
    pub fn find(&self, name: &str) -> Result<usize, usize> {
        self.entries.binary_search_by(|s| s.name.as_str().cmp(name))
    }

    pub fn get(&self, name: &str) -> Option<&Sticker> {
        self.find(name).ok().map(|i| &self.entries[i])
    }

    /// Insert at the sorted position. Returns `false` and leaves the index
    /// unchanged when the name is already present.
    pub fn insert(&mut self, sticker: Sticker) -> bool {
        match self.find(&sticker.name) {
            Ok(_) => {
                warn!(
                    "Tried to insert an already existing sticker {:?}, skipped",
                    sticker.name
                );
                false
            }
            Err(i) => {
                self.entries.insert(i, sticker);
                true
            }
        }
    }

    /// Remove the entry with the given name, if any.
    pub fn remove(&mut self, name: &str) -> Option<Sticker> {
        self.find(name).ok().map(|i| self.entries.remove(i))
    }

    /// The full ordered sequence
    pub fn snapshot(&self) -> &[Sticker] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
