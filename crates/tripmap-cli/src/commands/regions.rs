//! Regions command implementation

use crate::output::OutputWriter;
use crate::output_types::RegionRow;
use anyhow::{Context, Result};
use tripmap_core::config::LayeredConfig;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let catalog = config.catalog().context("Failed to build region catalog")?;

    let rows: Vec<RegionRow> = catalog
        .regions()
        .iter()
        .map(|region| RegionRow {
            name: region.name().to_string(),
            zones: region.zones().len(),
            boundaries: region.zones().iter().filter(|z| z.has_boundary()).count(),
            fallback: region.fallback_zone().name.clone(),
            default: if region.name() == catalog.default_region() { "yes" } else { "" },
        })
        .collect();

    if output.is_json() {
        output.result(serde_json::json!({
            "default_region": catalog.default_region(),
            "regions": rows,
        }))?;
    } else {
        output.section("Regions");
        output.table(rows);
    }

    Ok(())
}
