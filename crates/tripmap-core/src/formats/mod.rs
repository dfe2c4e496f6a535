//! Readers and writers for the on-disk formats
//!
//! One reader (`csv_table`) turns a POI table into [`Poi`](crate::models::Poi) records. Two
//! writers turn records into artifacts: `kml` for mobile import and `html_map` for the
//! interactive planner page.

use serde::Serialize;
use std::fmt;

pub mod csv_table;
pub mod html_map;
pub mod kml;

pub use csv_table::{read_pois, CsvPoiSource, REQUIRED_COLUMNS};
pub use html_map::{MapEmitter, MapOptions, TileLayer};
pub use kml::{KmlEmitter, KmlStyle, KmlStyleTable};

/// The two documents produced for every trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Kml,
    Map,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Kml, ArtifactKind::Map];

    /// Output file name for a country, e.g. `Japan_Trip_Mobile.kml`
    pub fn file_name(self, country: &str) -> String {
        match self {
            ArtifactKind::Kml => format!("{}_Trip_Mobile.kml", country),
            ArtifactKind::Map => format!("{}_Planner.html", country),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Kml => "mobile KML",
            ArtifactKind::Map => "interactive map",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
