use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Root directory for the image blob store.
///
/// A dedicated directory that `cacache` manages internally (index +
/// content-addressed blobs).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ImageCacheRoot(PathBuf);

impl ImageCacheRoot {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Debug for ImageCacheRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ImageCacheRoot").field(&self.0).finish()
    }
}

/// Stable key for locating an image blob within the cache.
///
/// Derived from a record's remote URL (its final path segment), so it never
/// contains separator characters and never requires a store lookup.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ImageCacheKey(String);

impl ImageCacheKey {
    pub fn new(key: String) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ImageCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ImageCacheKey").field(&self.0).finish()
    }
}

impl fmt::Display for ImageCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&waypin_model::PhotoRecord> for ImageCacheKey {
    fn from(record: &waypin_model::PhotoRecord) -> Self {
        Self(record.cache_key())
    }
}

/// A thin typed wrapper over `cacache` for image blobs. Disk tier of the
/// image cache; unbounded (no eviction policy, a known gap carried as-is).
#[derive(Clone, Debug)]
pub struct ImageBlobStore {
    root: ImageCacheRoot,
}

impl ImageBlobStore {
    pub fn new(root: ImageCacheRoot) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &ImageCacheRoot {
        &self.root
    }

    /// Read a blob, or `None` when the key has never been written.
    pub async fn read(&self, key: &ImageCacheKey) -> Result<Option<Vec<u8>>> {
        match cacache::read(self.root.as_path(), key.as_str()).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(cacache::Error::EntryNotFound(_, _)) => Ok(None),
            Err(cacache::Error::IntegrityError(err)) => {
                Err(Error::Internal(format!(
                    "cache entry failed integrity check: {key} ({err})"
                )))
            }
            Err(cacache::Error::SizeMismatch(wanted, actual)) => {
                Err(Error::Internal(format!(
                    "cache entry size mismatch: key={key}, wanted={wanted}, actual={actual}"
                )))
            }
            Err(cacache::Error::IoError(_, msg)) => {
                Err(Error::Internal(format!("cacache read I/O error: {msg}")))
            }
            Err(cacache::Error::SerdeError(_, msg)) => {
                Err(Error::Internal(format!("cacache read serde error: {msg}")))
            }
        }
    }

    pub async fn write(&self, key: &ImageCacheKey, bytes: &[u8]) -> Result<()> {
        cacache::write(self.root.as_path(), key.as_str(), bytes)
            .await
            .map(|_| ())
            .map_err(|e| {
                Error::Internal(format!("cacache write failed: {e}"))
            })
    }

    pub async fn remove(&self, key: &ImageCacheKey) -> Result<()> {
        let r_opts = cacache::index::RemoveOpts::new().remove_fully(true);
        r_opts
            .remove(self.root.as_path(), key.as_str())
            .await
            .map_err(|e| {
                Error::Internal(format!("cacache remove failed: {e}"))
            })
    }
}
