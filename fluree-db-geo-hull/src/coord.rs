//! Geographic coordinate with exact-match identity.

use geo_types::Coord;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A `(lon, lat)` pair.
///
/// Equality and hashing compare the raw bit patterns of both components, so
/// two coordinates are the same only if they are exactly the same `f64`
/// values. `0.0` and `-0.0` are distinct; a NaN equals itself when the bits
/// match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoCoord {
    pub lon: f64,
    pub lat: f64,
}

impl GeoCoord {
    /// Create a coordinate from longitude and latitude.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Both components are finite.
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    #[inline]
    fn bits(&self) -> (u64, u64) {
        (self.lon.to_bits(), self.lat.to_bits())
    }
}

impl PartialEq for GeoCoord {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for GeoCoord {}

impl Hash for GeoCoord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl From<(f64, f64)> for GeoCoord {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self::new(lon, lat)
    }
}

impl From<GeoCoord> for Coord<f64> {
    fn from(c: GeoCoord) -> Self {
        Coord { x: c.lon, y: c.lat }
    }
}

impl From<Coord<f64>> for GeoCoord {
    fn from(c: Coord<f64>) -> Self {
        Self::new(c.x, c.y)
    }
}
