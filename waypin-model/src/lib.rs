//! Core data model definitions shared across waypin crates.
#![allow(missing_docs)]

pub mod error;
pub mod geo;
pub mod ids;
pub mod photo;
pub mod pin;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use geo::{BoundingBox, Coordinate};
pub use ids::{PhotoId, PinId};
pub use photo::{PhotoDescriptor, PhotoRecord, cache_key_for};
pub use pin::PinRecord;
