use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::{ImageBlobStore, ImageCacheKey, ImageCacheRoot};
use crate::error::Result;

/// Two-tier image byte cache shared by all concurrent fetches.
///
/// The memory tier answers synchronously; the disk tier sits beneath it and
/// survives process restarts. Disk hits are promoted into memory. Writes are
/// keyed, so concurrent writes to different keys never conflict; same-key
/// writes are last-writer-wins, acceptable because the bytes are derived
/// deterministically from the same source. Neither tier evicts.
#[derive(Clone, Debug)]
pub struct ImageCache {
    memory: Arc<DashMap<ImageCacheKey, Arc<Vec<u8>>>>,
    disk: ImageBlobStore,
}

impl ImageCache {
    pub fn new(root: ImageCacheRoot) -> Self {
        Self {
            memory: Arc::new(DashMap::new()),
            disk: ImageBlobStore::new(root),
        }
    }

    /// Synchronous memory-tier lookup. Never touches the disk tier.
    pub fn peek(&self, key: &ImageCacheKey) -> Option<Arc<Vec<u8>>> {
        self.memory.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Full lookup: memory first, then disk with promotion into memory.
    pub async fn get(
        &self,
        key: &ImageCacheKey,
    ) -> Result<Option<Arc<Vec<u8>>>> {
        if let Some(bytes) = self.peek(key) {
            return Ok(Some(bytes));
        }

        match self.disk.read(key).await? {
            Some(bytes) => {
                debug!(%key, byte_len = bytes.len(), "disk cache hit, promoting");
                let bytes = Arc::new(bytes);
                self.memory.insert(key.clone(), Arc::clone(&bytes));
                Ok(Some(bytes))
            }
            None => Ok(None),
        }
    }

    /// Populate both tiers under the same key.
    pub async fn put(
        &self,
        key: &ImageCacheKey,
        bytes: Vec<u8>,
    ) -> Result<Arc<Vec<u8>>> {
        self.disk.write(key, &bytes).await?;
        let bytes = Arc::new(bytes);
        self.memory.insert(key.clone(), Arc::clone(&bytes));
        Ok(bytes)
    }

    /// Evict from both tiers. Called when a photo record (or its owning pin)
    /// is deleted.
    pub async fn remove(&self, key: &ImageCacheKey) -> Result<()> {
        self.memory.remove(key);
        self.disk.remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_peek_is_a_memory_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImageCache::new(ImageCacheRoot::new(dir.path().into()));
        let key = ImageCacheKey::new("a_m.jpg".into());

        assert!(cache.peek(&key).is_none());
        cache.put(&key, vec![1, 2, 3]).await.unwrap();
        assert_eq!(cache.peek(&key).unwrap().as_slice(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn disk_tier_survives_a_fresh_memory_tier() {
        let dir = tempfile::tempdir().unwrap();
        let key = ImageCacheKey::new("b_m.jpg".into());

        let cache = ImageCache::new(ImageCacheRoot::new(dir.path().into()));
        cache.put(&key, vec![9, 9]).await.unwrap();

        // New cache over the same root: memory empty, disk warm.
        let fresh = ImageCache::new(ImageCacheRoot::new(dir.path().into()));
        assert!(fresh.peek(&key).is_none());
        let bytes = fresh.get(&key).await.unwrap().unwrap();
        assert_eq!(bytes.as_slice(), &[9, 9]);
        // Promotion made it a memory hit.
        assert!(fresh.peek(&key).is_some());
    }

    #[tokio::test]
    async fn remove_evicts_both_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImageCache::new(ImageCacheRoot::new(dir.path().into()));
        let key = ImageCacheKey::new("c_m.jpg".into());

        cache.put(&key, vec![5]).await.unwrap();
        cache.remove(&key).await.unwrap();
        assert!(cache.peek(&key).is_none());
        assert!(cache.get(&key).await.unwrap().is_none());
    }
}
