//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use std::path::Path;
use tripmap_core::config::{CliConfigOverrides, LayeredConfig, CONFIG_FILE_NAME};

use crate::cli::Cli;

/// Load layered configuration: defaults, then the config file, then the environment
///
/// An explicit `--config` file must exist; the conventional `tripmap.toml` in the current
/// directory is optional.
pub fn load_config(config_file: Option<&Path>) -> Result<LayeredConfig> {
    let config = match config_file {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => LayeredConfig::with_defaults()
            .load_from_optional_file(CONFIG_FILE_NAME)
            .context("Failed to load configuration file")?,
    };

    Ok(config.load_from_env())
}

/// Load layered configuration with the global CLI overrides applied
pub fn load_config_for(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = load_config(cli.config.as_deref())?;
    config.update_from_cli(CliConfigOverrides {
        data_dir: cli.data_dir.clone(),
        output_dir: None,
        default_region: cli.default_region.clone(),
        regions_file: cli.regions_file.clone(),
    });
    Ok(config)
}
