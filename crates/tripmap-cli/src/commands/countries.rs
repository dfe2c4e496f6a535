//! Countries command implementation

use crate::discovery::discover_countries;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::CountryRow;
use anyhow::Result;
use tripmap_core::config::LayeredConfig;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let data_dir = &config.data_dir.value;
    if !data_dir.is_dir() {
        return Err(errors::no_countries(data_dir).into());
    }

    let countries = discover_countries(data_dir)?;
    if countries.is_empty() {
        return Err(errors::no_countries(data_dir).into());
    }

    let mut rows = Vec::with_capacity(countries.len());
    for country in &countries {
        let places_file = country.places_file()?.map(|path| path.display().to_string());
        rows.push(CountryRow::new(country, places_file));
    }

    if output.is_json() {
        output.result(serde_json::json!({
            "data_dir": data_dir.display().to_string(),
            "countries": rows,
        }))?;
    } else {
        output.section(format!("Countries in {}", data_dir.display()));
        output.table(rows);
    }

    Ok(())
}
