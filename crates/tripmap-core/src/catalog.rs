//! Region catalog
//!
//! A read-only registry of regions keyed by country name. The catalog is built once and
//! passed into the pipeline; nothing in the crate keeps it as global state, so callers
//! and tests can substitute their own regions.
//!
//! Lookups never fail: an unknown country name resolves to the designated default region.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Result, TripmapError};
use crate::models::{MapView, Region, Zone};

/// Region used when a country name is not in the catalog
pub const DEFAULT_REGION: &str = "Singapore";

#[derive(Debug, Clone)]
pub struct RegionCatalog {
    // Insertion order is kept for listing
    regions: Vec<Region>,
    default_region: String,
}

impl RegionCatalog {
    /// Create a catalog from regions, with `default_region` as the lookup fallback
    pub fn new(regions: Vec<Region>, default_region: impl Into<String>) -> Result<Self> {
        let default_region = default_region.into();
        let catalog = Self { regions, default_region };
        if catalog.find(&catalog.default_region).is_none() {
            return Err(TripmapError::UnknownDefaultRegion { name: catalog.default_region });
        }
        Ok(catalog)
    }

    /// The compiled-in catalog
    pub fn builtin() -> Self {
        Self {
            regions: vec![singapore(), japan(), thailand(), vietnam(), malaysia()],
            default_region: DEFAULT_REGION.to_string(),
        }
    }

    /// Resolve a country name to a region, falling back to the default region
    pub fn lookup(&self, country: &str) -> &Region {
        if let Some(region) = self.find(country) {
            return region;
        }

        tracing::warn!(
            country,
            fallback = %self.default_region,
            "Unknown country, using default region"
        );
        // Checked in `new` and `set_default`
        self.find(&self.default_region).unwrap_or(&self.regions[0])
    }

    /// Exact name match, then case-insensitive match
    pub fn find(&self, country: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name() == country).or_else(|| {
            let wanted = country.to_lowercase();
            self.regions.iter().find(|r| r.name().to_lowercase() == wanted)
        })
    }

    pub fn default_region(&self) -> &str {
        &self.default_region
    }

    /// Change the fallback region
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        match self.find(name) {
            Some(region) => {
                self.default_region = region.name().to_string();
                Ok(())
            }
            None => Err(TripmapError::UnknownDefaultRegion { name: name.to_string() }),
        }
    }

    /// Add a region, replacing any existing region with the same (case-insensitive) name
    pub fn insert(&mut self, region: Region) {
        let wanted = region.name().to_lowercase();
        match self.regions.iter_mut().find(|r| r.name().to_lowercase() == wanted) {
            Some(existing) => *existing = region,
            None => self.regions.push(region),
        }
    }

    /// Merge regions from a TOML regions file
    ///
    /// ```toml
    /// [[regions]]
    /// name = "Korea"
    /// center = [37.56, 126.97]
    /// zoom = 11
    ///
    /// [[regions.zones]]
    /// id = "seoul"
    /// name = "Seoul"
    /// color = "#e74c3c"
    /// center = [37.56, 126.97]
    /// zoom = 12
    /// ```
    pub fn load_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| TripmapError::ConfigInvalid {
            key: "regions_file".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })?;

        let file: RegionsFile = toml::from_str(&content).map_err(|e| TripmapError::ConfigInvalid {
            key: "regions_file".to_string(),
            reason: format!("Failed to parse {}: {}", path.display(), e),
        })?;

        tracing::debug!(path = %path.display(), count = file.regions.len(), "Loaded regions file");
        for region in file.regions {
            self.insert(region);
        }

        Ok(self)
    }

    /// All regions in insertion order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name())
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Deserialize)]
struct RegionsFile {
    #[serde(default)]
    regions: Vec<Region>,
}

// The builtin tables below are valid by construction: non-empty, unique ids and names.
fn region(name: &str, view: MapView, zones: Vec<Zone>) -> Region {
    Region::new(name, view, zones).unwrap_or_else(|e| panic!("builtin region {name}: {e}"))
}

fn singapore() -> Region {
    region(
        "Singapore",
        MapView::new(1.31, 103.84, 12),
        vec![
            Zone::new("chinatown", "Chinatown & CBD", "#e74c3c", MapView::new(1.2820, 103.8440, 16))
                .with_description("Heritage shophouses, temples, and Michelin food.")
                .with_boundary(&[
                    [1.2885, 103.8430],
                    [1.2850, 103.8490],
                    [1.2780, 103.8470],
                    [1.2790, 103.8400],
                ]),
            Zone::new(
                "kampong",
                "Kampong Glam & Bugis",
                "#27ae60",
                MapView::new(1.3010, 103.8580, 16),
            )
                .with_description("Malay heritage, gin bars, and trendy lanes.")
                .with_boundary(&[
                    [1.3040, 103.8560],
                    [1.3030, 103.8620],
                    [1.2990, 103.8600],
                    [1.3000, 103.8550],
                ]),
            Zone::new(
                "civic",
                "Civic District & Marina Bay",
                "#2980b9",
                MapView::new(1.2890, 103.8550, 15),
            )
                .with_description("Museums, Skylines, and Supertrees.")
                .with_boundary(&[
                    [1.2980, 103.8480],
                    [1.2920, 103.8660],
                    [1.2780, 103.8660],
                    [1.2880, 103.8460],
                ]),
            Zone::new("orchard", "Orchard & Tanglin", "#8e44ad", MapView::new(1.3080, 103.8250, 15))
                .with_description("Shopping belt and lush gardens.")
                .with_boundary(&[
                    [1.3160, 103.8140],
                    [1.3050, 103.8400],
                    [1.2990, 103.8350],
                    [1.3100, 103.8100],
                ]),
            Zone::new("east", "Katong & East Coast", "#d35400", MapView::new(1.3080, 103.9000, 15))
                .with_description("Peranakan culture and laksa.")
                .with_boundary(&[
                    [1.3150, 103.9000],
                    [1.3140, 103.9080],
                    [1.3000, 103.9060],
                    [1.3000, 103.8950],
                ]),
            Zone::new("outliers", "Worth the Travel", "#7f8c8d", MapView::new(1.3500, 103.8000, 11))
                .with_description("Unique experiences further afield."),
        ],
    )
}

fn japan() -> Region {
    region(
        "Japan",
        MapView::new(35.68, 139.65, 10),
        vec![
            Zone::new("tokyo", "Tokyo", "#e74c3c", MapView::new(35.68, 139.65, 12))
                .with_description("Capital city and urban exploration"),
            Zone::new("osaka", "Osaka", "#27ae60", MapView::new(34.67, 135.50, 12))
                .with_description("Street food and nightlife"),
            Zone::new("kyoto", "Kyoto", "#2980b9", MapView::new(35.01, 135.78, 12))
                .with_description("Temples, gardens, and tradition"),
            Zone::new("other", "Other Regions", "#8e44ad", MapView::new(35.5, 137.5, 10))
                .with_description("Day trips and regional explores"),
        ],
    )
}

fn thailand() -> Region {
    region(
        "Thailand",
        MapView::new(13.73, 100.52, 10),
        vec![
            Zone::new("bangkok", "Bangkok", "#e74c3c", MapView::new(13.73, 100.52, 12))
                .with_description("Thailand's vibrant capital"),
            Zone::new("north", "Northern Thailand", "#27ae60", MapView::new(18.78, 98.98, 10))
                .with_description("Mountains and temples"),
            Zone::new("south", "Southern Beaches", "#2980b9", MapView::new(8.65, 100.14, 10))
                .with_description("Island paradise"),
            Zone::new("central", "Central Thailand", "#d35400", MapView::new(13.5, 99.5, 10))
                .with_description("Historical sites"),
        ],
    )
}

fn vietnam() -> Region {
    region(
        "Vietnam",
        MapView::new(21.03, 105.85, 9),
        vec![
            Zone::new("hanoi", "Hanoi", "#e74c3c", MapView::new(21.03, 105.85, 12))
                .with_description("Capital city charm"),
            Zone::new("hcm", "Ho Chi Minh City", "#27ae60", MapView::new(10.77, 106.70, 12))
                .with_description("Southern metropolis"),
            Zone::new("danang", "Da Nang", "#2980b9", MapView::new(16.07, 108.23, 12))
                .with_description("Beach city and Hoi An gateway"),
            Zone::new("other", "Other Regions", "#8e44ad", MapView::new(15.5, 107.0, 9))
                .with_description("Regional explores"),
        ],
    )
}

fn malaysia() -> Region {
    region(
        "Malaysia",
        MapView::new(3.14, 101.69, 10),
        vec![
            Zone::new("kl", "Kuala Lumpur", "#e74c3c", MapView::new(3.14, 101.69, 12))
                .with_description("Capital city exploration"),
            Zone::new("penang", "Penang", "#27ae60", MapView::new(5.41, 100.33, 12))
                .with_description("Heritage and beaches"),
            Zone::new("malacca", "Malacca", "#2980b9", MapView::new(2.20, 102.25, 12))
                .with_description("Historical port city"),
            Zone::new("sabah", "Sabah", "#d35400", MapView::new(5.37, 118.67, 10))
                .with_description("Borneo adventures"),
        ],
    )
}
