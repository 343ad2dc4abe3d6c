//! Coordinate handling.
//!
//! A location is only meaningful when both latitude and longitude are
//! present, parseable and non-zero. Anything else is dropped entirely
//! rather than defaulting to `(0, 0)`.

/// Decimal places kept on stored coordinates.
const COORD_PRECISION: f64 = 1_000_000.0;

/// A validated latitude/longitude pair, rounded to 6 decimals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Round a coordinate to 6 decimal places.
pub fn coord_value(v: f64) -> f64 {
    (v * COORD_PRECISION).round() / COORD_PRECISION
}

impl Location {
    /// Build a location from raw coordinates, rejecting incomplete,
    /// non-finite and zero values.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if latitude == 0.0 || longitude == 0.0 {
            return None;
        }
        Some(Self {
            latitude: coord_value(latitude),
            longitude: coord_value(longitude),
        })
    }

    /// Build a location from optional coordinates. Both must be present.
    pub fn from_pair(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Self::new(lat, lng),
            _ => None,
        }
    }

    /// Parse a location from string coordinates, e.g. a provider's
    /// `"lat,lng"` fields split in the adapter.
    pub fn parse(latitude: &str, longitude: &str) -> Option<Self> {
        let lat = latitude.trim().parse::<f64>().ok()?;
        let lng = longitude.trim().parse::<f64>().ok()?;
        Self::new(lat, lng)
    }

    /// Coordinates in GeoJSON order: `[longitude, latitude]`.
    pub fn geo_coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}
