use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tripmap - Turn a table of travel places into a mobile KML and an interactive planner
#[derive(Parser, Debug)]
#[command(name = "tripmap")]
#[command(about = "Generate trip maps from a table of places", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Show planned actions without executing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Configuration file (defaults to ./tripmap.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding one folder per country
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// TOML file with extra or overriding regions
    #[arg(long, global = true, value_name = "FILE")]
    pub regions_file: Option<PathBuf>,

    /// Region used for countries missing from the catalog
    #[arg(long, global = true, value_name = "NAME")]
    pub default_region: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List country folders found in the data directory
    Countries,

    /// Generate the mobile KML and the interactive planner for a country
    Generate(GenerateArgs),

    /// Show how a country's places are distributed across its zones
    Zones(ZonesArgs),

    /// List the regions in the catalog
    Regions,

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Country name or its number from `tripmap countries` (defaults to the first country)
    pub country: Option<String>,

    /// Read places from this CSV instead of the country's data folder
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Directory the artifacts are written to
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Fixed element id for the map container, for reproducible output
    #[arg(long, value_name = "ID")]
    pub map_id: Option<String>,

    /// Interactive mode - pick the country from a list
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(Parser, Debug)]
pub struct ZonesArgs {
    /// Country name or its number from `tripmap countries` (defaults to the first country)
    pub country: Option<String>,

    /// Read places from this CSV instead of the country's data folder
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Interactive mode - pick the country from a list
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "tripmap", "generate", "japan", "--json", "--dry-run", "--map-id", "map_x",
        ]);
        assert!(cli.json);
        assert!(cli.dry_run);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.country.as_deref(), Some("japan"));
                assert_eq!(args.map_id.as_deref(), Some("map_x"));
                assert!(!args.interactive);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
