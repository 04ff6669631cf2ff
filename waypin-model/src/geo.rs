use crate::error::{ModelError, Result};

pub const LAT_MIN: f64 = -90.0;
pub const LAT_MAX: f64 = 90.0;
pub const LON_MIN: f64 = -180.0;
pub const LON_MAX: f64 = 180.0;

/// Half-extent of the search bounding box, in degrees, on each axis.
const BOUNDING_BOX_HALF_EXTENT: f64 = 1.0;

/// A geographic point. Immutable input to a photo search.
///
/// The constructor rejects non-finite components; out-of-range but finite
/// values are accepted and clamped later by [`BoundingBox::around`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ModelError::InvalidCoordinate(format!(
                "components must be finite, got ({latitude}, {longitude})"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Search bounding box derived from a [`Coordinate`].
///
/// Expands the seed point by one degree on each axis and clamps every bound
/// to the global latitude/longitude ranges. Bounds clamp, never wrap: a seed
/// at longitude 179.5 yields `lon_max == 180.0`, not `-179.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn around(coordinate: Coordinate) -> Self {
        Self {
            lat_min: (coordinate.latitude() - BOUNDING_BOX_HALF_EXTENT)
                .max(LAT_MIN),
            lat_max: (coordinate.latitude() + BOUNDING_BOX_HALF_EXTENT)
                .min(LAT_MAX),
            lon_min: (coordinate.longitude() - BOUNDING_BOX_HALF_EXTENT)
                .max(LON_MIN),
            lon_max: (coordinate.longitude() + BOUNDING_BOX_HALF_EXTENT)
                .min(LON_MAX),
        }
    }
}

impl std::fmt::Display for BoundingBox {
    /// Wire format expected by the search endpoint:
    /// `lon_min,lat_min,lon_max,lat_max`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.lon_min, self.lat_min, self.lon_max, self.lat_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_contains_seed_coordinate() {
        let samples = [
            (0.0, 0.0),
            (45.5, -122.6),
            (-33.8, 151.2),
            (90.0, 180.0),
            (-90.0, -180.0),
        ];
        for (lat, lon) in samples {
            let coordinate = Coordinate::new(lat, lon).unwrap();
            let bbox = BoundingBox::around(coordinate);
            assert!(bbox.lat_min <= lat && lat <= bbox.lat_max);
            assert!(bbox.lon_min <= lon && lon <= bbox.lon_max);
            assert!(bbox.lat_min >= LAT_MIN && bbox.lat_max <= LAT_MAX);
            assert!(bbox.lon_min >= LON_MIN && bbox.lon_max <= LON_MAX);
        }
    }

    #[test]
    fn bounding_box_clamps_near_pole_and_antimeridian() {
        let coordinate = Coordinate::new(89.5, 179.5).unwrap();
        let bbox = BoundingBox::around(coordinate);
        assert_eq!(bbox.lat_max, 90.0);
        assert_eq!(bbox.lon_max, 180.0);
        assert_eq!(bbox.lat_min, 88.5);
        assert_eq!(bbox.lon_min, 178.5);
    }

    #[test]
    fn bounding_box_wire_format_is_lon_lat_ordered() {
        let coordinate = Coordinate::new(10.0, 20.0).unwrap();
        let bbox = BoundingBox::around(coordinate);
        assert_eq!(bbox.to_string(), "19,9,21,11");
    }

    #[test]
    fn coordinate_rejects_non_finite_components() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn coordinate_accepts_out_of_range_finite_values() {
        // Out-of-range values are clamped by the bounding box, not rejected.
        let coordinate = Coordinate::new(120.0, 200.0).unwrap();
        let bbox = BoundingBox::around(coordinate);
        assert_eq!(bbox.lat_max, 90.0);
        assert_eq!(bbox.lon_max, 180.0);
    }
}
