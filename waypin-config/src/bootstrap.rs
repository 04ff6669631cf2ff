use std::sync::Arc;

use waypin_core::{
    CollectionService, FlickrApiProvider, ImageCache, ImageService,
    PersistentStore, cache::ImageCacheRoot,
};

use crate::models::Config;

/// Assemble the pipeline from a loaded config.
///
/// Builds the search provider, the two-tier image cache rooted at the
/// configured directory, and the collection service over the given store.
/// All collaborators are constructed explicitly here; nothing is ambient.
pub fn build_collection_service(
    config: &Config,
    store: Arc<dyn PersistentStore>,
) -> CollectionService {
    let provider = FlickrApiProvider::with_base_url(
        config.api.api_key.clone(),
        config.api.base_url.clone(),
    );
    let cache =
        ImageCache::new(ImageCacheRoot::new(config.cache.root.clone()));
    let images = ImageService::new(cache);

    CollectionService::new(Arc::new(provider), store, images)
        .with_max_photos(config.search.max_photos)
}
