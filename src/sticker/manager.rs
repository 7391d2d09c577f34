//! Shared access to one sticker catalog
//!
//! Readers (list, match, open a file to post it) take the shared guard;
//! add and rename take the exclusive guard for their whole duration,
//! including the download. Guards are handed to the caller instead of being
//! taken inside each operation so a read-then-act sequence such as
//! "resolve one sticker, then open its file" cannot interleave with a
//! writer.

use std::path::Path;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::catalog::{Catalog, CatalogOptions};
use crate::Result;

/// Owns the catalog and arbitrates shared and exclusive access
#[derive(Debug)]
pub struct StickerManager {
    catalog: RwLock<Catalog>,
}

impl StickerManager {
    /// Scan `root` and wrap the resulting catalog
    pub fn load(root: impl AsRef<Path>, options: CatalogOptions) -> Result<Self> {
        Ok(Self::from_catalog(Catalog::load(root, options)?))
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
        }
    }

    /// Shared access for queries
    pub async fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().await
    }

    /// Exclusive access for add, rename and reload
    pub async fn write(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.catalog.write().await
    }

    pub fn into_inner(self) -> Catalog {
        self.catalog.into_inner()
    }
}
