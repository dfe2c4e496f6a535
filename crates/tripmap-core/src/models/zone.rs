use serde::{Deserialize, Serialize};

use super::geometry::{LatLon, MapView};

/// A named sub-region of a country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Stable short identifier, used as the sidebar DOM key
    pub id: String,

    /// Display name, also the value POI zone hints are matched against
    pub name: String,

    /// CSS color token for the boundary fill and sidebar header
    pub color: String,

    #[serde(default)]
    pub description: String,

    /// View a client flies to when the zone is selected
    #[serde(flatten)]
    pub view: MapView,

    /// Boundary vertices; empty means nothing is drawn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boundary: Vec<LatLon>,
}

impl Zone {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        view: MapView,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            description: String::new(),
            view,
            boundary: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_boundary(mut self, vertices: &[[f64; 2]]) -> Self {
        self.boundary = vertices.iter().copied().map(LatLon::from).collect();
        self
    }

    pub fn has_boundary(&self) -> bool {
        !self.boundary.is_empty()
    }

    /// Case-insensitive exact comparison of a zone hint against the display name
    pub fn matches_hint(&self, hint: &str) -> bool {
        self.name.to_lowercase() == hint.to_lowercase()
    }
}
