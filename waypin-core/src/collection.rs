//! Collection orchestration: search for a pin's photos, materialize records,
//! and reset collections with a bounded random sample.

use std::sync::Arc;

use tracing::{debug, info, warn};
use waypin_model::{PhotoDescriptor, PhotoRecord, PinRecord};

use crate::cache::ImageCacheKey;
use crate::error::Result;
use crate::image_service::ImageService;
use crate::provider::PhotoSearch;
use crate::sample::pick_indices;
use crate::store::PersistentStore;

/// Default cap on the number of records materialized per pin.
const DEFAULT_MAX_PHOTOS: usize = 24;

/// Ties the pipeline together: search → sample → persist → (lazily) resolve.
///
/// Owns Arc'd collaborators; cheap to clone, thread-agnostic. Errors surface
/// to the caller, no retries.
#[derive(Clone)]
pub struct CollectionService {
    search: Arc<dyn PhotoSearch>,
    store: Arc<dyn PersistentStore>,
    images: ImageService,
    max_photos: usize,
}

impl std::fmt::Debug for CollectionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionService")
            .field("max_photos", &self.max_photos)
            .finish()
    }
}

impl CollectionService {
    pub fn new(
        search: Arc<dyn PhotoSearch>,
        store: Arc<dyn PersistentStore>,
        images: ImageService,
    ) -> Self {
        Self {
            search,
            store,
            images,
            max_photos: DEFAULT_MAX_PHOTOS,
        }
    }

    pub fn with_max_photos(mut self, max_photos: usize) -> Self {
        self.max_photos = max_photos;
        self
    }

    pub fn images(&self) -> &ImageService {
        &self.images
    }

    /// Populate a pin's collection if it has no photos yet; otherwise return
    /// the existing records untouched.
    pub async fn ensure_photos(
        &self,
        pin: &PinRecord,
    ) -> Result<Vec<PhotoRecord>> {
        let existing = self.store.photos_for_pin(pin.id).await?;
        if !existing.is_empty() {
            return Ok(existing);
        }
        self.refresh(pin).await
    }

    /// Reset a pin's collection: search around its coordinate, keep a
    /// bounded sample of the results, replace the persisted records, and
    /// commit. Cached images of replaced records are evicted.
    pub async fn refresh(&self, pin: &PinRecord) -> Result<Vec<PhotoRecord>> {
        let coordinate = pin.coordinate()?;
        let descriptors = self.search.search_photos(coordinate).await?;
        info!(pin_id = %pin.id, found = descriptors.len(), "refreshing collection");

        for photo in self.store.photos_for_pin(pin.id).await? {
            self.store.delete_photo(photo.id).await?;
            self.evict(&photo).await;
        }

        let chosen = self.sample(&descriptors);
        let mut created = Vec::with_capacity(chosen.len());
        for descriptor in chosen {
            let Some(url) = descriptor.url_m.as_deref() else {
                debug!(pin_id = %pin.id, "skipping descriptor without url_m");
                continue;
            };
            created.push(self.store.create_photo(pin.id, url).await?);
        }

        self.store.save().await?;
        info!(pin_id = %pin.id, created = created.len(), "collection refreshed");
        Ok(created)
    }

    /// Remove one photo from its collection, evicting its cached image.
    pub async fn remove_photo(
        &self,
        photo: &PhotoRecord,
    ) -> Result<()> {
        self.store.delete_photo(photo.id).await?;
        self.evict(photo).await;
        self.store.save().await
    }

    /// Remove a pin, cascading to its photos and their cached images.
    pub async fn remove_pin(&self, pin: &PinRecord) -> Result<()> {
        let cascaded = self.store.delete_pin(pin.id).await?;
        for photo in &cascaded {
            self.evict(photo).await;
        }
        self.store.save().await
    }

    /// Bounded sample of the search results, server order preserved within
    /// the sample (indices are drawn ascending). Sampling is with
    /// replacement, so a descriptor may be chosen more than once.
    fn sample<'d>(
        &self,
        descriptors: &'d [PhotoDescriptor],
    ) -> Vec<&'d PhotoDescriptor> {
        if descriptors.len() <= self.max_photos {
            return descriptors.iter().collect();
        }
        pick_indices(self.max_photos, descriptors.len() as u32)
            .into_iter()
            .map(|index| &descriptors[(index - 1) as usize])
            .collect()
    }

    async fn evict(&self, photo: &PhotoRecord) {
        let key = ImageCacheKey::from(photo);
        // Eviction is best-effort; a failed removal must not abort the
        // record mutation that already happened.
        if let Err(error) = self.images.cache().remove(&key).await {
            warn!(%key, %error, "failed to evict cached image");
        }
    }
}
