//! Command implementations

mod config;
mod countries;
mod generate;
mod regions;
mod zones;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config_for;
use crate::discovery::{self, Country};
use crate::errors;
use crate::interactive;
use crate::output::OutputWriter;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use tripmap_core::config::LayeredConfig;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config_for(&cli)?;

    match cli.command {
        Commands::Countries => countries::execute(&config, &output),
        Commands::Generate(args) => generate::execute(args, config, &output, cli.dry_run),
        Commands::Zones(args) => zones::execute(args, &config, &output),
        Commands::Regions => regions::execute(&config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}

/// The places table a command works on
#[derive(Debug)]
struct TripSource {
    country: String,
    path: PathBuf,
}

/// Pick the country and its places table
///
/// An explicit `--input` wins. Otherwise the country comes from the prompt, the selector
/// (name or number), or the first discovered country.
fn resolve_source(
    selector: Option<&str>,
    input: Option<&Path>,
    interactive: bool,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<TripSource> {
    if let Some(input) = input {
        let country = match selector {
            Some(name) => name.trim().to_string(),
            None => discovery::country_from_places_file(input).ok_or_else(|| {
                anyhow!(
                    "Cannot tell the country from {}. \
                     Pass it explicitly: tripmap generate <COUNTRY> --input <CSV>",
                    input.display()
                )
            })?,
        };
        return Ok(TripSource { country, path: input.to_path_buf() });
    }

    let data_dir = &config.data_dir.value;
    if !data_dir.is_dir() {
        return Err(errors::no_countries(data_dir).into());
    }
    let countries = discovery::discover_countries(data_dir)?;
    let first = countries.first().ok_or_else(|| errors::no_countries(data_dir))?;

    let chosen: &Country = if interactive {
        &countries[interactive::select_country(&countries)?]
    } else {
        match selector {
            Some(selector) => discovery::resolve(&countries, selector).unwrap_or_else(|| {
                output.warning(format!("Unknown country '{}', using {}", selector, first.name));
                first
            }),
            None => {
                output.info(format!("No country given, using {}", first.name));
                first
            }
        }
    };

    let path = chosen
        .places_file()?
        .ok_or_else(|| errors::no_places_file(&chosen.name, &chosen.data_dir()))?;
    Ok(TripSource { country: chosen.name.clone(), path })
}
