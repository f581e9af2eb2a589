//! Geodetic positions on the Earth's surface

use serde::{Deserialize, Serialize};

/// A geodetic latitude/longitude pair in degrees
///
/// Longitude is positive east. Solver outputs are normalized to
/// latitude in [-90°, 90°] and longitude in (-180°, 180°].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicCoordinate {
    /// Geodetic latitude in degrees
    pub lat: f64,
    /// Longitude in degrees, positive east
    pub long: f64,
}

impl GeographicCoordinate {
    /// Create a new coordinate from latitude and longitude in degrees
    pub fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }

    /// True when both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.long.is_finite()
    }

    /// `[longitude, latitude]`, the vertex order used by GeoJSON
    pub fn to_long_lat(&self) -> [f64; 2] {
        [self.long, self.lat]
    }

    /// Inverse of [`GeographicCoordinate::to_long_lat`]
    pub fn from_long_lat(long_lat: [f64; 2]) -> Self {
        Self {
            lat: long_lat[1],
            long: long_lat[0],
        }
    }
}
