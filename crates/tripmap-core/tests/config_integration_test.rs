//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};
use tripmap_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};

const ENV_KEYS: [&str; 5] = [
    "TRIPMAP_DATA_DIR",
    "TRIPMAP_OUTPUT_DIR",
    "TRIPMAP_DEFAULT_REGION",
    "TRIPMAP_TILE_URL",
    "TRIPMAP_REGIONS_FILE",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let file = config_file(
        r#"
output_dir = "from-file"
default_region = "Japan"
"#,
    );

    env::set_var("TRIPMAP_OUTPUT_DIR", "from-env");

    let config =
        LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.output_dir.value, PathBuf::from("from-env"));
    assert_eq!(config.output_dir.source, ConfigSource::Environment);
    assert_eq!(config.default_region.value, "Japan");
    assert_eq!(config.default_region.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_everything() {
    clear_env();
    let file = config_file(r#"output_dir = "from-file""#);
    env::set_var("TRIPMAP_OUTPUT_DIR", "from-env");

    let mut config =
        LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        output_dir: Some(PathBuf::from("from-cli")),
        ..Default::default()
    });

    assert_eq!(config.output_dir.value, PathBuf::from("from-cli"));
    assert_eq!(config.output_dir.source, ConfigSource::Cli);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();
    env::set_var("TRIPMAP_TILE_URL", "https://example.com/static.png");
    env::set_var("TRIPMAP_DEFAULT_REGION", "   ");
    env::set_var("TRIPMAP_DATA_DIR", "");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.tile_url.source, ConfigSource::Default);
    assert_eq!(config.default_region.value, "Singapore");
    assert_eq!(config.default_region.source, ConfigSource::Default);
    assert_eq!(config.data_dir.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_env_regions_file_extends_catalog() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let regions = temp.path().join("regions.toml");
    fs::write(
        &regions,
        r##"
[[regions]]
name = "Korea"
center = [37.56, 126.97]
zoom = 11

[[regions.zones]]
id = "seoul"
name = "Seoul"
color = "#e74c3c"
center = [37.56, 126.97]
zoom = 12

[[regions.zones]]
id = "other"
name = "Other Regions"
color = "#8e44ad"
center = [36.5, 127.8]
zoom = 7
"##,
    )
    .unwrap();

    env::set_var("TRIPMAP_REGIONS_FILE", &regions);
    env::set_var("TRIPMAP_DEFAULT_REGION", "korea");

    let config = LayeredConfig::with_defaults().load_from_env();
    let catalog = config.catalog().unwrap();

    assert_eq!(catalog.default_region(), "Korea");
    assert_eq!(catalog.lookup("Nowhere").name(), "Korea");
    assert_eq!(catalog.lookup("Korea").fallback_zone().id, "other");

    clear_env();
}

#[test]
#[serial]
fn test_full_precedence_chain() {
    clear_env();
    let file = config_file(
        r#"
data_dir = "file-data"
output_dir = "file-out"
default_region = "Thailand"
"#,
    );
    env::set_var("TRIPMAP_OUTPUT_DIR", "env-out");
    env::set_var("TRIPMAP_DEFAULT_REGION", "Vietnam");

    let mut config =
        LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        default_region: Some("Malaysia".to_string()),
        ..Default::default()
    });

    let sources: Vec<(&str, ConfigSource)> =
        config.entries().iter().map(|e| (e.key, e.source)).collect();
    assert_eq!(
        sources,
        vec![
            ("data_dir", ConfigSource::File),
            ("output_dir", ConfigSource::Environment),
            ("default_region", ConfigSource::Cli),
            ("tile_url", ConfigSource::Default),
            ("tile_attribution", ConfigSource::Default),
            ("regions_file", ConfigSource::Default),
        ]
    );
    assert_eq!(config.catalog().unwrap().default_region(), "Malaysia");

    clear_env();
}
