use async_trait::async_trait;
use tokio::sync::broadcast;
use waypin_model::{Coordinate, PhotoId, PhotoRecord, PinId, PinRecord};

use crate::error::Result;

/// Change notification emitted by the store as records mutate.
///
/// Positions are indices into the store's ordered views at the moment the
/// mutation applied, which is what a UI layer needs to animate inserts and
/// deletes.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    PinInserted {
        id: PinId,
        position: usize,
    },
    PinDeleted {
        id: PinId,
        position: usize,
    },
    PhotoInserted {
        pin_id: PinId,
        id: PhotoId,
        position: usize,
    },
    PhotoDeleted {
        pin_id: PinId,
        id: PhotoId,
        position: usize,
    },
    PhotoUpdated {
        pin_id: PinId,
        id: PhotoId,
        position: usize,
    },
}

/// Repository port for map pins.
///
/// Intentionally typed at the boundary; adapters map to their own storage
/// representations.
#[async_trait]
pub trait PinRepository: Send + Sync {
    async fn create_pin(&self, coordinate: Coordinate) -> Result<PinRecord>;
    async fn pins(&self) -> Result<Vec<PinRecord>>;
    async fn get_pin(&self, id: PinId) -> Result<Option<PinRecord>>;

    /// Delete a pin, cascading to its owned photos.
    ///
    /// Returns the cascaded photo records so the caller can evict their
    /// cached images; the store itself never touches the image cache.
    async fn delete_pin(&self, id: PinId) -> Result<Vec<PhotoRecord>>;
}

/// Repository port for photo records.
///
/// Creation requires an existing owning pin: no photo record may exist whose
/// pin does not.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn create_photo(
        &self,
        pin_id: PinId,
        remote_url: &str,
    ) -> Result<PhotoRecord>;
    async fn photos_for_pin(&self, pin_id: PinId) -> Result<Vec<PhotoRecord>>;
    async fn delete_photo(&self, id: PhotoId) -> Result<PhotoRecord>;
}

/// Full store contract: both repositories, durability, and observation.
#[async_trait]
pub trait PersistentStore: PinRepository + PhotoRepository {
    /// Commit all mutations durably. Mutations are visible to readers as
    /// soon as they apply; durability requires an explicit save. Concurrent
    /// saves are not supported and must be serialized by the caller.
    async fn save(&self) -> Result<()>;

    /// Subscribe to the change-notification stream.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
