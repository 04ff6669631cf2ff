use crate::error::Result;
use crate::geo::Coordinate;
use crate::ids::PinId;

/// Persisted map pin. Owns a one-to-many collection of photo records;
/// deleting a pin cascades to its photos and their cached images.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PinRecord {
    pub id: PinId,
    pub latitude: f64,
    pub longitude: f64,
}

impl PinRecord {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            id: PinId::new(),
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
        }
    }

    pub fn coordinate(&self) -> Result<Coordinate> {
        Coordinate::new(self.latitude, self.longitude)
    }
}
