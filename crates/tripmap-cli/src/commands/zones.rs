//! Zones command implementation

use crate::cli::ZonesArgs;
use crate::output::OutputWriter;
use crate::output_types::{SkippedInfo, ZoneRow, ZonesOutput};
use anyhow::{Context, Result};
use tripmap_core::config::LayeredConfig;
use tripmap_core::pipeline::Pipeline;

use super::resolve_source;

pub fn execute(args: ZonesArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let catalog = config.catalog().context("Failed to build region catalog")?;
    let source = resolve_source(
        args.country.as_deref(),
        args.input.as_deref(),
        args.interactive,
        config,
        output,
    )?;

    let pipeline = Pipeline::new(&catalog);
    let trip = pipeline.load(&source.country, &source.path)?;
    let partition = pipeline.partition(&trip);
    let counts = partition.counts();

    if output.is_json() {
        output.result(ZonesOutput {
            country: trip.country.clone(),
            region: partition.region().name().to_string(),
            source: trip.source.display().to_string(),
            locations: partition.total(),
            skipped: trip.skipped.iter().map(SkippedInfo::from).collect(),
            zones: counts,
        })?;
    } else {
        output.section(format!("{} ({} zones)", trip.country, partition.region().name()));
        output.kv("Source", trip.source.display());
        output.kv("Locations", partition.total());
        if !trip.skipped.is_empty() {
            output.kv("Skipped rows", trip.skipped.len());
        }
        output.table(counts.iter().map(ZoneRow::from).collect());
    }

    Ok(())
}
