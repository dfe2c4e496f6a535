use serde::Serialize;
use tabled::Tabled;
use tripmap_core::assign::ZoneCount;
use tripmap_core::config::ConfigEntry;
use tripmap_core::formats::ArtifactKind;
use tripmap_core::pipeline::{ArtifactOutcome, TripReport};
use tripmap_core::ports::SkippedRow;

use crate::discovery::Country;

/// Row for the countries listing
#[derive(Debug, Serialize, Tabled)]
pub struct CountryRow {
    #[tabled(rename = "#")]
    pub number: usize,
    #[tabled(rename = "Country")]
    pub name: String,
    #[tabled(rename = "Places file")]
    pub places_file: String,
}

impl CountryRow {
    pub fn new(country: &Country, places_file: Option<String>) -> Self {
        Self {
            number: country.number,
            name: country.name.clone(),
            places_file: places_file.unwrap_or_else(|| "(missing)".to_string()),
        }
    }
}

/// Row for a zone partition
#[derive(Debug, Serialize, Tabled)]
pub struct ZoneRow {
    #[tabled(rename = "Zone")]
    pub name: String,
    #[tabled(rename = "Id")]
    pub id: String,
    #[tabled(rename = "Places")]
    pub count: usize,
    #[tabled(rename = "Boundary")]
    pub boundary: &'static str,
}

impl From<&ZoneCount> for ZoneRow {
    fn from(zone: &ZoneCount) -> Self {
        Self {
            name: zone.name.clone(),
            id: zone.id.clone(),
            count: zone.count,
            boundary: if zone.has_boundary { "yes" } else { "no" },
        }
    }
}

/// Row for the regions listing
#[derive(Debug, Serialize, Tabled)]
pub struct RegionRow {
    #[tabled(rename = "Region")]
    pub name: String,
    #[tabled(rename = "Zones")]
    pub zones: usize,
    #[tabled(rename = "With boundary")]
    pub boundaries: usize,
    #[tabled(rename = "Fallback zone")]
    pub fallback: String,
    #[tabled(rename = "Default")]
    pub default: &'static str,
}

/// Row for the configuration listing
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

impl From<ConfigEntry> for ConfigRow {
    fn from(entry: ConfigEntry) -> Self {
        Self { key: entry.key, value: entry.value, source: entry.source.to_string() }
    }
}

/// Output for zones command
#[derive(Debug, Serialize)]
pub struct ZonesOutput {
    pub country: String,
    pub region: String,
    pub source: String,
    pub locations: usize,
    pub skipped: Vec<SkippedInfo>,
    pub zones: Vec<ZoneCount>,
}

/// Output for generate command
#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub country: String,
    pub region: String,
    pub source: String,
    pub locations: usize,
    pub skipped: Vec<SkippedInfo>,
    pub zones: Vec<ZoneCount>,
    pub artifacts: Vec<ArtifactInfo>,
}

impl From<&TripReport> for GenerateOutput {
    fn from(report: &TripReport) -> Self {
        Self {
            country: report.country.clone(),
            region: report.region.clone(),
            source: report.source.display().to_string(),
            locations: report.poi_count,
            skipped: report.skipped.iter().map(SkippedInfo::from).collect(),
            zones: report.zones.clone(),
            artifacts: report.artifacts.iter().map(ArtifactInfo::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkippedInfo {
    pub line: Option<u64>,
    pub name: String,
    pub reason: String,
}

impl From<&SkippedRow> for SkippedInfo {
    fn from(row: &SkippedRow) -> Self {
        Self { line: row.line, name: row.name.clone(), reason: row.reason.clone() }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtifactInfo {
    pub kind: ArtifactKind,
    pub path: String,
    pub written: bool,
    pub error: Option<String>,
}

impl From<&ArtifactOutcome> for ArtifactInfo {
    fn from(outcome: &ArtifactOutcome) -> Self {
        Self {
            kind: outcome.kind,
            path: outcome.path.display().to_string(),
            written: outcome.is_written(),
            error: outcome.error().map(|e| e.to_string()),
        }
    }
}
