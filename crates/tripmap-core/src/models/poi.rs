use serde::{Deserialize, Serialize};

use super::geometry::LatLon;

/// Category used when a row carries no Category column
pub const DEFAULT_CATEGORY: &str = "Other";

/// Name used when a row has a blank Name cell
pub const UNKNOWN_NAME: &str = "Unknown";

/// A single travel point of interest
///
/// Immutable once parsed. Zone membership is never stored here; it lives in the
/// [`ZonePartition`](crate::assign::ZonePartition) produced for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Display name, never empty
    pub name: String,

    pub position: LatLon,

    /// Free-text category, drives pin and KML styling
    pub category: String,

    pub address: String,

    /// Free text that may contain inline markup such as `<b>`
    pub notes: String,

    /// Zone name as written in the source data
    pub zone_hint: String,
}

impl Poi {
    /// Create a POI with default category and empty optional fields
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        let name = name.into();
        Self {
            name: if name.trim().is_empty() { UNKNOWN_NAME.to_string() } else { name },
            position: LatLon::new(lat, lon),
            category: DEFAULT_CATEGORY.to_string(),
            address: String::new(),
            notes: String::new(),
            zone_hint: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_zone_hint(mut self, zone_hint: impl Into<String>) -> Self {
        self.zone_hint = zone_hint.into();
        self
    }

    pub fn lat(&self) -> f64 {
        self.position.lat
    }

    pub fn lon(&self) -> f64 {
        self.position.lon
    }
}
