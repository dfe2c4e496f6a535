//! CSV table reader for POIs
//!
//! Expects the headers `Name, Latitude, Longitude, Category, Address, Notes, Zone` (exact,
//! case-sensitive). `Name`, `Latitude` and `Longitude` are required columns; the others may
//! be absent and take their defaults.

use serde::Deserialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{Result, TripmapError};
use crate::models::poi::DEFAULT_CATEGORY;
use crate::models::Poi;
use crate::ports::{PoiBatch, PoiSource, SkippedRow};

/// Columns a table must carry
pub const REQUIRED_COLUMNS: [&str; 3] = ["Name", "Latitude", "Longitude"];

/// Reads POIs from a CSV file on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvPoiSource;

impl PoiSource for CsvPoiSource {
    fn load(&self, location: &Path) -> Result<PoiBatch> {
        let file = File::open(location).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                TripmapError::SourceNotFound { path: location.to_path_buf() }
            }
            _ => TripmapError::SourceRead {
                path: location.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        let batch = read_pois(file, location)?;
        tracing::debug!(
            path = %location.display(),
            rows = batch.pois.len(),
            skipped = batch.skipped.len(),
            "Read POI table"
        );
        Ok(batch)
    }
}

/// Parse a POI table from any reader; `origin` is only used in error messages
pub fn read_pois<R: Read>(reader: R, origin: &Path) -> Result<PoiBatch> {
    let source_error = |e: csv::Error| TripmapError::SourceRead {
        path: origin.to_path_buf(),
        reason: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers().map_err(source_error)?.clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(TripmapError::MissingColumn {
                path: origin.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    let mut batch = PoiBatch::default();
    for result in reader.records() {
        let record = result.map_err(source_error)?;
        let line = record.position().map(|p| p.line());
        let row: PoiRecord = record.deserialize(Some(&headers)).map_err(source_error)?;

        match row.into_poi() {
            Ok(poi) => batch.pois.push(poi),
            Err(skipped) => {
                let skipped = SkippedRow { line, ..skipped };
                tracing::warn!(
                    path = %origin.display(),
                    line = ?skipped.line,
                    name = %skipped.name,
                    reason = %skipped.reason,
                    "Skipping row"
                );
                batch.skipped.push(skipped);
            }
        }
    }

    Ok(batch)
}

/// One raw table row; every cell is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PoiRecord {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Latitude")]
    latitude: Option<String>,
    #[serde(rename = "Longitude")]
    longitude: Option<String>,
    #[serde(rename = "Category")]
    category: Option<String>,
    #[serde(rename = "Address")]
    address: Option<String>,
    #[serde(rename = "Notes")]
    notes: Option<String>,
    #[serde(rename = "Zone")]
    zone: Option<String>,
}

impl PoiRecord {
    fn into_poi(self) -> std::result::Result<Poi, SkippedRow> {
        let name = self.name.unwrap_or_default();
        let coordinates = parse_coordinate("Latitude", self.latitude.as_deref())
            .and_then(|lat| Ok((lat, parse_coordinate("Longitude", self.longitude.as_deref())?)));

        let (lat, lon) = match coordinates {
            Ok(pair) => pair,
            Err(reason) => return Err(SkippedRow { line: None, name, reason }),
        };

        Ok(Poi::new(name, lat, lon)
            .with_category(self.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()))
            .with_address(self.address.unwrap_or_default())
            .with_notes(self.notes.unwrap_or_default())
            .with_zone_hint(self.zone.unwrap_or_default()))
    }
}

/// Blank cells default to 0.0; anything else must be a finite number
fn parse_coordinate(column: &str, raw: Option<&str>) -> std::result::Result<f64, String> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(0.0),
        Some(value) => value,
    };

    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(format!("{} '{}' is not a number", column, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(table: &str) -> Result<PoiBatch> {
        read_pois(table.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn test_full_row() {
        let batch = parse(
            "Name,Latitude,Longitude,Category,Address,Notes,Zone\n\
             Tian Tian,1.2812,103.8435,Food,\"1 Kadayanallur St, #01-10\",\
             <b>Chicken rice</b>,Chinatown & CBD\n",
        )
        .unwrap();

        assert_eq!(batch.pois.len(), 1);
        let poi = &batch.pois[0];
        assert_eq!(poi.name, "Tian Tian");
        assert_eq!(poi.lat(), 1.2812);
        assert_eq!(poi.lon(), 103.8435);
        assert_eq!(poi.category, "Food");
        assert_eq!(poi.address, "1 Kadayanallur St, #01-10");
        assert_eq!(poi.notes, "<b>Chicken rice</b>");
        assert_eq!(poi.zone_hint, "Chinatown & CBD");
    }

    #[test]
    fn test_optional_columns_default() {
        let batch = parse("Name,Latitude,Longitude\nMerlion,1.2868,103.8545\n").unwrap();

        let poi = &batch.pois[0];
        assert_eq!(poi.category, "Other");
        assert_eq!(poi.address, "");
        assert_eq!(poi.notes, "");
        assert_eq!(poi.zone_hint, "");
    }

    #[test]
    fn test_blank_coordinates_default_to_zero() {
        let batch = parse("Name,Latitude,Longitude\nSomewhere,,\n").unwrap();
        assert_eq!(batch.pois[0].position.lat, 0.0);
        assert_eq!(batch.pois[0].position.lon, 0.0);
    }

    #[test]
    fn test_bad_coordinates_skip_row() {
        let batch = parse(
            "Name,Latitude,Longitude\n\
             Good,1.0,2.0\n\
             Bad,north,103.8\n\
             Worse,1.0,NaN\n\
             Also Good,3.0,4.0\n",
        )
        .unwrap();

        let names: Vec<&str> = batch.pois.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Good", "Also Good"]);

        assert_eq!(batch.skipped.len(), 2);
        assert_eq!(batch.skipped[0].name, "Bad");
        assert_eq!(batch.skipped[0].line, Some(3));
        assert!(batch.skipped[0].reason.contains("Latitude"));
        assert!(batch.skipped[1].reason.contains("Longitude"));
    }

    #[test]
    fn test_missing_required_column() {
        let result = parse("Name,Latitude\nNo Longitude,1.0\n");
        assert!(matches!(
            result,
            Err(TripmapError::MissingColumn { ref column, .. }) if column == "Longitude"
        ));
    }

    #[test]
    fn test_headers_are_case_sensitive() {
        let result = parse("name,latitude,longitude\nx,1,2\n");
        assert!(matches!(result, Err(TripmapError::MissingColumn { .. })));
    }

    #[test]
    fn test_headers_only_is_empty() {
        let batch = parse("Name,Latitude,Longitude,Category\n").unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = CsvPoiSource.load(Path::new("/definitely/not/here_places.csv"));
        assert!(matches!(result, Err(TripmapError::SourceNotFound { .. })));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Name,Latitude,Longitude,Zone").unwrap();
        writeln!(file, "Sensoji,35.7148,139.7967,Tokyo").unwrap();

        let batch = CsvPoiSource.load(file.path()).unwrap();
        assert_eq!(batch.pois.len(), 1);
        assert_eq!(batch.pois[0].zone_hint, "Tokyo");
    }
}
