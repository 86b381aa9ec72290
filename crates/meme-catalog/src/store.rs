//! Shared catalog snapshot with whole-snapshot reload.

use crate::catalog::Catalog;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Hands out `Arc<Catalog>` snapshots. Requests keep the snapshot they started with;
/// a reload replaces the whole catalog and never mutates one in place.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    /// Loads the catalog at `path` (empty on failure, see [`Catalog::load`]).
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let catalog = Catalog::load(&path);
        Self {
            path,
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Wraps an already built catalog; `path` is used by later reloads.
    pub fn with_catalog(path: impl Into<PathBuf>, catalog: Catalog) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().await.clone()
    }

    /// Re-reads the catalog document and swaps it in. Returns the new snapshot.
    pub async fn reload(&self) -> Arc<Catalog> {
        let fresh = Arc::new(Catalog::load(&self.path));
        *self.current.write().await = fresh.clone();
        info!(
            path = %self.path.display(),
            templates = fresh.len(),
            "Meme catalog reloaded"
        );
        fresh
    }
}
