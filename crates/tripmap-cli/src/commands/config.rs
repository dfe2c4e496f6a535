//! Config command implementation

use crate::output::OutputWriter;
use crate::output_types::ConfigRow;
use anyhow::Result;
use tripmap_core::config::LayeredConfig;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let rows: Vec<ConfigRow> = config.entries().into_iter().map(ConfigRow::from).collect();

    if output.is_json() {
        output.result(rows)?;
    } else {
        output.section("Configuration");
        output.table(rows);
    }

    Ok(())
}
