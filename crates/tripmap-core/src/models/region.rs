use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::geometry::MapView;
use super::zone::Zone;
use crate::error::{Result, TripmapError};

/// The zone catalog and default view for one country
///
/// A region always has at least one zone, and its zones have unique ids and unique
/// (case-insensitive) names. The last zone is the fallback that receives every POI
/// whose zone hint matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegionRecord", into = "RegionRecord")]
pub struct Region {
    name: String,
    view: MapView,
    zones: Vec<Zone>,
}

impl Region {
    /// Create a region, validating the zone list
    pub fn new(name: impl Into<String>, view: MapView, zones: Vec<Zone>) -> Result<Self> {
        let name = name.into();

        if zones.is_empty() {
            return Err(TripmapError::EmptyRegion { name });
        }

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for zone in &zones {
            if !ids.insert(zone.id.as_str()) {
                return Err(TripmapError::DuplicateZone {
                    region: name,
                    field: "id".to_string(),
                    value: zone.id.clone(),
                });
            }
            if !names.insert(zone.name.to_lowercase()) {
                return Err(TripmapError::DuplicateZone {
                    region: name,
                    field: "name".to_string(),
                    value: zone.name.clone(),
                });
            }
        }

        Ok(Self { name, view, zones })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default view of the whole region
    pub fn view(&self) -> MapView {
        self.view
    }

    /// Zones in catalog order
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// The catch-all zone
    pub fn fallback_zone(&self) -> &Zone {
        // `new` rejects empty zone lists
        &self.zones[self.zones.len() - 1]
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }
}

/// Unvalidated on-disk representation of a region
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegionRecord {
    name: String,
    #[serde(flatten)]
    view: MapView,
    zones: Vec<Zone>,
}

impl TryFrom<RegionRecord> for Region {
    type Error = TripmapError;

    fn try_from(record: RegionRecord) -> Result<Self> {
        Region::new(record.name, record.view, record.zones)
    }
}

impl From<Region> for RegionRecord {
    fn from(region: Region) -> Self {
        Self { name: region.name, view: region.view, zones: region.zones }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: &str, name: &str) -> Zone {
        Zone::new(id, name, "#8e44ad", MapView::new(0.0, 0.0, 10))
    }

    #[test]
    fn test_region_requires_zones() {
        let result = Region::new("Nowhere", MapView::new(0.0, 0.0, 3), vec![]);
        assert!(matches!(result, Err(TripmapError::EmptyRegion { .. })));
    }

    #[test]
    fn test_duplicate_zone_names_rejected() {
        let result = Region::new(
            "Japan",
            MapView::new(35.68, 139.65, 10),
            vec![zone("tokyo", "Tokyo"), zone("tokyo2", "TOKYO")],
        );
        assert!(matches!(
            result,
            Err(TripmapError::DuplicateZone { ref field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_duplicate_zone_ids_rejected() {
        let result = Region::new(
            "Japan",
            MapView::new(35.68, 139.65, 10),
            vec![zone("tokyo", "Tokyo"), zone("tokyo", "Osaka")],
        );
        assert!(matches!(
            result,
            Err(TripmapError::DuplicateZone { ref field, .. }) if field == "id"
        ));
    }

    #[test]
    fn test_fallback_is_last_zone() {
        let region = Region::new(
            "Japan",
            MapView::new(35.68, 139.65, 10),
            vec![zone("tokyo", "Tokyo"), zone("other", "Other Regions")],
        )
        .unwrap();

        assert_eq!(region.fallback_zone().id, "other");
        assert_eq!(region.zone("tokyo").map(|z| z.name.as_str()), Some("Tokyo"));
        assert!(region.zone("kyoto").is_none());
    }

    #[test]
    fn test_deserialize_validates() {
        let result: std::result::Result<Region, _> = toml::from_str(
            r#"
name = "Empty"
center = [0.0, 0.0]
zoom = 3
zones = []
"#,
        );
        assert!(result.is_err());
    }
}
