//! Two-tier image byte cache: an in-memory map over a disk blob store.

mod blob_store;
mod image_cache;

pub use blob_store::{ImageBlobStore, ImageCacheKey, ImageCacheRoot};
pub use image_cache::ImageCache;
