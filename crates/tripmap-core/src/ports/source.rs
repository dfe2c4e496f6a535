use std::path::Path;

use crate::error::Result;
use crate::models::Poi;

/// Port for reading POI rows from a table
pub trait PoiSource {
    /// Read every usable row at `location`
    ///
    /// Rows with unparsable coordinates are reported in [`PoiBatch::skipped`] rather than
    /// failing the whole read.
    fn load(&self, location: &Path) -> Result<PoiBatch>;
}

/// Rows read from one source
#[derive(Debug, Clone, Default)]
pub struct PoiBatch {
    /// Parsed POIs in source order
    pub pois: Vec<Poi>,

    /// Rows that were dropped
    pub skipped: Vec<SkippedRow>,
}

impl PoiBatch {
    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }
}

/// A row dropped because of a row-level defect
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the source, when known
    pub line: Option<u64>,
    pub name: String,
    pub reason: String,
}
