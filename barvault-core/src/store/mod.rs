//! Blob storage seam.
//!
//! The backfill driver only needs a key-value `put`; the trait keeps the
//! backing store (filesystem, S3-compatible bucket) swappable. Keys are
//! slash-separated, e.g. `polygon-30m/NVDA/2024-07`.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors from blob-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage key '{0}': keys must be relative slash-separated paths")]
    InvalidKey(String),

    #[error("store I/O error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Durable key-value blob storage.
pub trait BlobStore: Send + Sync {
    /// Human-readable name of this store.
    fn name(&self) -> &str;

    /// Durably write `payload` under `key`, replacing any existing blob.
    fn put(&self, key: &str, payload: &[u8]) -> Result<(), StoreError>;
}

/// Filesystem-backed blob store rooted at a directory.
///
/// Keys map to relative paths under the root. Writes go to a `.tmp`
/// sibling and are renamed into place, so a crashed run never leaves a
/// half-written blob at the final key.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a key to a path under the root, rejecting empty keys and
    /// anything that could escape it.
    fn blob_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let rel = Path::new(key);
        let escapes = rel.components().any(|c| {
            !matches!(c, Component::Normal(part) if !part.is_empty())
        });
        if key.is_empty() || escapes {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

impl BlobStore for FsBlobStore {
    fn name(&self) -> &str {
        "filesystem"
    }

    fn put(&self, key: &str, payload: &[u8]) -> Result<(), StoreError> {
        let path = self.blob_path(key)?;
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, payload).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)?;
        Ok(())
    }
}
