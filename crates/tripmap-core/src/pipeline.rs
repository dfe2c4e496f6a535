//! Trip pipeline
//!
//! Reads a POI table, partitions it into the country's zones and writes both artifacts.
//! Each artifact is rendered and written on its own: a failure on one side is recorded in the
//! report and does not stop the other.

use std::path::{Path, PathBuf};

use crate::assign::{assign, ZoneCount, ZonePartition};
use crate::catalog::RegionCatalog;
use crate::error::{Result, TripmapError};
use crate::formats::{ArtifactKind, CsvPoiSource, KmlEmitter, MapEmitter, MapOptions};
use crate::models::{Poi, Region};
use crate::output::FsArtifactSink;
use crate::ports::{ArtifactSink, PoiSource, SkippedRow};

/// POIs read for one country
#[derive(Debug, Clone)]
pub struct LoadedTrip {
    pub country: String,
    pub source: PathBuf,
    pub pois: Vec<Poi>,
    pub skipped: Vec<SkippedRow>,
}

/// Outcome of rendering and writing one artifact
#[derive(Debug)]
pub struct ArtifactOutcome {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub result: Result<()>,
}

impl ArtifactOutcome {
    pub fn is_written(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&TripmapError> {
        self.result.as_ref().err()
    }
}

/// Summary of one pipeline run
#[derive(Debug)]
pub struct TripReport {
    pub country: String,
    /// Name of the region that was actually used, after fallback
    pub region: String,
    pub source: PathBuf,
    pub poi_count: usize,
    pub skipped: Vec<SkippedRow>,
    pub zones: Vec<ZoneCount>,
    pub artifacts: Vec<ArtifactOutcome>,
}

impl TripReport {
    pub fn all_written(&self) -> bool {
        self.artifacts.iter().all(ArtifactOutcome::is_written)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.artifacts.iter().filter(|a| !a.is_written())
    }
}

/// Path of an artifact inside `output_dir`
pub fn artifact_path(output_dir: &Path, kind: ArtifactKind, country: &str) -> PathBuf {
    output_dir.join(kind.file_name(country))
}

/// Drives one trip from table to artifacts
pub struct Pipeline<'a> {
    catalog: &'a RegionCatalog,
    source: Box<dyn PoiSource + 'a>,
    sink: Box<dyn ArtifactSink + 'a>,
    kml: KmlEmitter,
    map: MapEmitter,
}

impl<'a> Pipeline<'a> {
    /// Pipeline reading CSV from disk and writing artifacts to disk
    pub fn new(catalog: &'a RegionCatalog) -> Self {
        Self {
            catalog,
            source: Box::new(CsvPoiSource),
            sink: Box::new(FsArtifactSink),
            kml: KmlEmitter::default(),
            map: MapEmitter::default(),
        }
    }

    pub fn with_source(mut self, source: impl PoiSource + 'a) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn with_sink(mut self, sink: impl ArtifactSink + 'a) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_map_options(mut self, options: MapOptions) -> Self {
        self.map = MapEmitter::new(options);
        self
    }

    /// Region for a country, falling back to the catalog default
    pub fn region(&self, country: &str) -> &'a Region {
        self.catalog.lookup(country)
    }

    /// Read the table at `source`; fails when it has no usable rows
    pub fn load(&self, country: &str, source: &Path) -> Result<LoadedTrip> {
        let batch = self.source.load(source)?;

        if !batch.skipped.is_empty() {
            tracing::warn!(
                path = %source.display(),
                skipped = batch.skipped.len(),
                "Some rows were skipped"
            );
        }
        if batch.is_empty() {
            return Err(TripmapError::EmptyDataset { path: source.to_path_buf() });
        }

        Ok(LoadedTrip {
            country: country.to_string(),
            source: source.to_path_buf(),
            pois: batch.pois,
            skipped: batch.skipped,
        })
    }

    /// Zone partition of a loaded trip
    pub fn partition<'t>(&self, trip: &'t LoadedTrip) -> ZonePartition<'t>
    where
        'a: 't,
    {
        assign(self.region(&trip.country), &trip.pois)
    }

    /// Load, partition, render and write both artifacts into `output_dir`
    ///
    /// Source errors abort before anything is written. Render and write errors are recorded
    /// per artifact in the report.
    pub fn run(&self, country: &str, source: &Path, output_dir: &Path) -> Result<TripReport> {
        let trip = self.load(country, source)?;
        let partition = self.partition(&trip);

        let artifacts = ArtifactKind::ALL
            .into_iter()
            .map(|kind| {
                let path = artifact_path(output_dir, kind, country);
                let result = self
                    .render(kind, &trip, &partition)
                    .and_then(|document| self.sink.write(&path, &document));

                match &result {
                    Ok(()) => {
                        tracing::info!(artifact = %kind, path = %path.display(), "Wrote artifact")
                    }
                    Err(e) => tracing::warn!(
                        artifact = %kind,
                        path = %path.display(),
                        error = %e,
                        "Artifact failed"
                    ),
                }
                ArtifactOutcome { kind, path, result }
            })
            .collect();

        let region = partition.region().name().to_string();
        let zones = partition.counts();
        let poi_count = trip.pois.len();

        Ok(TripReport {
            country: trip.country,
            region,
            source: trip.source,
            poi_count,
            skipped: trip.skipped,
            zones,
            artifacts,
        })
    }

    fn render(
        &self,
        kind: ArtifactKind,
        trip: &LoadedTrip,
        partition: &ZonePartition<'_>,
    ) -> Result<String> {
        match kind {
            ArtifactKind::Kml => self.kml.emit(&trip.country, &trip.pois),
            ArtifactKind::Map => self.map.render(partition, &trip.country),
        }
    }
}
