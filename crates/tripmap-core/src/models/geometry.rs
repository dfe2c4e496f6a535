//! Coordinate and view types shared by the catalog, the models and both emitters.
//!
//! Coordinates are kept in the natural `(latitude, longitude)` order everywhere in the
//! crate. Only the KML emitter flips them, because KML expects `lon,lat,alt`.

use serde::{Deserialize, Serialize};

/// A WGS 84 position in decimal degrees
///
/// Serialized as a `[lat, lon]` pair so region files stay compact.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Position as a `[lat, lon]` array, the order Leaflet expects
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

impl From<[f64; 2]> for LatLon {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<LatLon> for [f64; 2] {
    fn from(value: LatLon) -> Self {
        value.to_array()
    }
}

/// Where a map client should look: a center point and a zoom level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLon,
    pub zoom: u8,
}

impl MapView {
    pub const fn new(lat: f64, lon: f64, zoom: u8) -> Self {
        Self { center: LatLon::new(lat, lon), zoom }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latlon_serializes_as_pair() {
        let point = LatLon::new(1.2812, 103.8435);
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, "[1.2812,103.8435]");

        let parsed: LatLon = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, point);
    }

    #[test]
    fn test_map_view_from_toml() {
        let view: MapView = toml::from_str("center = [35.68, 139.65]\nzoom = 10").unwrap();
        assert_eq!(view, MapView::new(35.68, 139.65, 10));
    }
}
