use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;
use waypin_model::{Coordinate, PhotoId, PhotoRecord, PinId, PinRecord};

use super::ports::{
    ChangeEvent, PersistentStore, PhotoRepository, PinRepository,
};
use crate::error::{Error, Result};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Default)]
struct State {
    pins: Vec<PinRecord>,
    photos: HashMap<PinId, Vec<PhotoRecord>>,
}

/// In-memory reference adapter for the store ports.
///
/// The production persisted store is an external collaborator; this adapter
/// exercises the contract, including the cascade-delete and no-orphan-photo
/// invariants. Mutations apply to the live state immediately and are copied
/// into the durable snapshot on [`PersistentStore::save`].
#[derive(Debug, Clone)]
pub struct MemoryStore {
    live: Arc<RwLock<State>>,
    durable: Arc<RwLock<State>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            live: Arc::new(RwLock::new(State::default())),
            durable: Arc::new(RwLock::new(State::default())),
            events,
        }
    }

    fn emit(&self, event: ChangeEvent) {
        // Nobody subscribed is fine; events are advisory.
        let _ = self.events.send(event);
    }

    /// Pins as of the last save. Test hook for the durability contract.
    pub async fn durable_pins(&self) -> Vec<PinRecord> {
        self.durable.read().await.pins.clone()
    }
}

#[async_trait]
impl PinRepository for MemoryStore {
    async fn create_pin(&self, coordinate: Coordinate) -> Result<PinRecord> {
        let record = PinRecord::new(coordinate);
        let position = {
            let mut state = self.live.write().await;
            state.pins.push(record.clone());
            state.photos.insert(record.id, Vec::new());
            state.pins.len() - 1
        };
        debug!(pin_id = %record.id, position, "pin created");
        self.emit(ChangeEvent::PinInserted {
            id: record.id,
            position,
        });
        Ok(record)
    }

    async fn pins(&self) -> Result<Vec<PinRecord>> {
        Ok(self.live.read().await.pins.clone())
    }

    async fn get_pin(&self, id: PinId) -> Result<Option<PinRecord>> {
        Ok(self
            .live
            .read()
            .await
            .pins
            .iter()
            .find(|pin| pin.id == id)
            .cloned())
    }

    async fn delete_pin(&self, id: PinId) -> Result<Vec<PhotoRecord>> {
        let (position, cascaded) = {
            let mut state = self.live.write().await;
            let position = state
                .pins
                .iter()
                .position(|pin| pin.id == id)
                .ok_or_else(|| Error::NotFound(format!("pin {id}")))?;
            state.pins.remove(position);
            let cascaded = state.photos.remove(&id).unwrap_or_default();
            (position, cascaded)
        };

        // Cascade events first, highest position first, so observers can
        // apply deletions against their current ordered view.
        for (index, photo) in cascaded.iter().enumerate().rev() {
            self.emit(ChangeEvent::PhotoDeleted {
                pin_id: id,
                id: photo.id,
                position: index,
            });
        }
        self.emit(ChangeEvent::PinDeleted { id, position });
        debug!(pin_id = %id, cascaded = cascaded.len(), "pin deleted");
        Ok(cascaded)
    }
}

#[async_trait]
impl PhotoRepository for MemoryStore {
    async fn create_photo(
        &self,
        pin_id: PinId,
        remote_url: &str,
    ) -> Result<PhotoRecord> {
        let record = PhotoRecord::new(pin_id, remote_url);
        let position = {
            let mut state = self.live.write().await;
            let photos = state
                .photos
                .get_mut(&pin_id)
                .ok_or_else(|| Error::NotFound(format!("pin {pin_id}")))?;
            photos.push(record.clone());
            photos.len() - 1
        };
        self.emit(ChangeEvent::PhotoInserted {
            pin_id,
            id: record.id,
            position,
        });
        Ok(record)
    }

    async fn photos_for_pin(&self, pin_id: PinId) -> Result<Vec<PhotoRecord>> {
        self.live
            .read()
            .await
            .photos
            .get(&pin_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("pin {pin_id}")))
    }

    async fn delete_photo(&self, id: PhotoId) -> Result<PhotoRecord> {
        let (pin_id, position, record) = {
            let mut state = self.live.write().await;
            let mut found = None;
            for (pin_id, photos) in state.photos.iter_mut() {
                if let Some(position) =
                    photos.iter().position(|photo| photo.id == id)
                {
                    found = Some((*pin_id, position, photos.remove(position)));
                    break;
                }
            }
            found.ok_or_else(|| Error::NotFound(format!("photo {id}")))?
        };
        self.emit(ChangeEvent::PhotoDeleted {
            pin_id,
            id,
            position,
        });
        Ok(record)
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn save(&self) -> Result<()> {
        let snapshot = self.live.read().await.clone();
        *self.durable.write().await = snapshot;
        debug!("store saved");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate() -> Coordinate {
        Coordinate::new(45.5, -122.6).unwrap()
    }

    #[tokio::test]
    async fn photo_creation_requires_an_existing_pin() {
        let store = MemoryStore::new();
        let orphan = PinId::new();
        let err = store
            .create_photo(orphan, "https://farm/x_m.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn deleting_a_pin_cascades_to_its_photos() {
        let store = MemoryStore::new();
        let pin = store.create_pin(coordinate()).await.unwrap();
        store
            .create_photo(pin.id, "https://farm/a_m.jpg")
            .await
            .unwrap();
        store
            .create_photo(pin.id, "https://farm/b_m.jpg")
            .await
            .unwrap();

        let cascaded = store.delete_pin(pin.id).await.unwrap();
        assert_eq!(cascaded.len(), 2);
        assert!(store.get_pin(pin.id).await.unwrap().is_none());
        assert!(store.photos_for_pin(pin.id).await.is_err());
    }

    #[tokio::test]
    async fn change_events_carry_positions() {
        let store = MemoryStore::new();
        let mut events = store.subscribe();

        let pin = store.create_pin(coordinate()).await.unwrap();
        let photo = store
            .create_photo(pin.id, "https://farm/a_m.jpg")
            .await
            .unwrap();
        store.delete_photo(photo.id).await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            ChangeEvent::PinInserted {
                id: pin.id,
                position: 0
            }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            ChangeEvent::PhotoInserted {
                pin_id: pin.id,
                id: photo.id,
                position: 0
            }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            ChangeEvent::PhotoDeleted {
                pin_id: pin.id,
                id: photo.id,
                position: 0
            }
        );
    }

    #[tokio::test]
    async fn mutations_are_durable_only_after_save() {
        let store = MemoryStore::new();
        let pin = store.create_pin(coordinate()).await.unwrap();

        assert!(store.durable_pins().await.is_empty());
        store.save().await.unwrap();
        assert_eq!(store.durable_pins().await, vec![pin]);
    }
}
