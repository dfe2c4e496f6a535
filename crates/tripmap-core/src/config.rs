use crate::catalog::{RegionCatalog, DEFAULT_REGION};
use crate::error::{Result, TripmapError};
use crate::formats::TileLayer;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Conventional name of the configuration file
pub const CONFIG_FILE_NAME: &str = "tripmap.toml";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSource::Default => "default",
            ConfigSource::File => "file",
            ConfigSource::Environment => "env",
            ConfigSource::Cli => "cli",
        };
        f.write_str(label)
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for tripmap
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Root scanned for `<country>/data/*_places.csv`
    pub data_dir: ConfigValue<PathBuf>,
    pub output_dir: ConfigValue<PathBuf>,
    /// Region used when a country is not in the catalog
    pub default_region: ConfigValue<String>,
    pub tile_url: ConfigValue<String>,
    pub tile_attribution: ConfigValue<String>,
    /// Extra or overriding regions
    pub regions_file: ConfigValue<Option<PathBuf>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let tiles = TileLayer::default();
        Self {
            data_dir: ConfigValue::new(PathBuf::from("."), ConfigSource::Default),
            output_dir: ConfigValue::new(PathBuf::from("output"), ConfigSource::Default),
            default_region: ConfigValue::new(DEFAULT_REGION.to_string(), ConfigSource::Default),
            tile_url: ConfigValue::new(tiles.url, ConfigSource::Default),
            tile_attribution: ConfigValue::new(tiles.attribution, ConfigSource::Default),
            regions_file: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| TripmapError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| TripmapError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(data_dir) = file_config.data_dir {
            self.data_dir.update(data_dir, ConfigSource::File);
        }

        if let Some(output_dir) = file_config.output_dir {
            self.output_dir.update(output_dir, ConfigSource::File);
        }

        if let Some(default_region) = file_config.default_region {
            let name = parse_region_name(&default_region)?;
            self.default_region.update(name, ConfigSource::File);
        }

        if let Some(tile_url) = file_config.tile_url {
            let url = parse_tile_url(&tile_url)?;
            self.tile_url.update(url, ConfigSource::File);
        }

        if let Some(tile_attribution) = file_config.tile_attribution {
            self.tile_attribution.update(tile_attribution, ConfigSource::File);
        }

        // Relative region files resolve against the config file's directory
        if let Some(regions_file) = file_config.regions_file {
            let resolved = match path.as_ref().parent() {
                Some(base) if regions_file.is_relative() => base.join(regions_file),
                _ => regions_file,
            };
            self.regions_file.update(Some(resolved), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load the file at `path` if it exists, otherwise keep the current values
    pub fn load_from_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().is_file() {
            self.load_from_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // TRIPMAP_DATA_DIR
        if let Some(data_dir) = non_empty_var("TRIPMAP_DATA_DIR") {
            self.data_dir.update(PathBuf::from(data_dir), ConfigSource::Environment);
        }

        // TRIPMAP_OUTPUT_DIR
        if let Some(output_dir) = non_empty_var("TRIPMAP_OUTPUT_DIR") {
            self.output_dir.update(PathBuf::from(output_dir), ConfigSource::Environment);
        }

        // TRIPMAP_DEFAULT_REGION
        if let Ok(region_str) = env::var("TRIPMAP_DEFAULT_REGION") {
            match parse_region_name(&region_str) {
                Ok(name) => self.default_region.update(name, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid TRIPMAP_DEFAULT_REGION value '{}': expected a region name",
                    region_str
                ),
            }
        }

        // TRIPMAP_TILE_URL
        if let Ok(url_str) = env::var("TRIPMAP_TILE_URL") {
            match parse_tile_url(&url_str) {
                Ok(url) => self.tile_url.update(url, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid TRIPMAP_TILE_URL value '{}': \
                     expected a URL template with {{z}}, {{x}} and {{y}}",
                    url_str
                ),
            }
        }

        // TRIPMAP_REGIONS_FILE
        if let Some(regions_file) = non_empty_var("TRIPMAP_REGIONS_FILE") {
            self.regions_file.update(Some(PathBuf::from(regions_file)), ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir.update(data_dir, ConfigSource::Cli);
        }

        if let Some(output_dir) = overrides.output_dir {
            self.output_dir.update(output_dir, ConfigSource::Cli);
        }

        if let Some(default_region) = overrides.default_region {
            self.default_region.update(default_region, ConfigSource::Cli);
        }

        if let Some(regions_file) = overrides.regions_file {
            self.regions_file.update(Some(regions_file), ConfigSource::Cli);
        }
    }

    /// Tile layer for the interactive map
    pub fn tile_layer(&self) -> TileLayer {
        TileLayer {
            url: self.tile_url.value.clone(),
            attribution: self.tile_attribution.value.clone(),
        }
    }

    /// Build the region catalog: builtin regions, then the regions file, then the default
    pub fn catalog(&self) -> Result<RegionCatalog> {
        let mut catalog = RegionCatalog::builtin();
        if let Some(path) = &self.regions_file.value {
            catalog = catalog.load_file(path)?;
        }
        catalog.set_default(&self.default_region.value)?;
        Ok(catalog)
    }

    /// All values in a fixed order, rendered for inspection
    pub fn entries(&self) -> Vec<ConfigEntry> {
        let regions_file = match &self.regions_file.value {
            Some(path) => path.display().to_string(),
            None => "(none)".to_string(),
        };

        let (data_dir, output_dir) = (&self.data_dir, &self.output_dir);
        vec![
            ConfigEntry::new("data_dir", data_dir.value.display(), data_dir.source),
            ConfigEntry::new("output_dir", output_dir.value.display(), output_dir.source),
            ConfigEntry::new(
                "default_region",
                &self.default_region.value,
                self.default_region.source,
            ),
            ConfigEntry::new("tile_url", &self.tile_url.value, self.tile_url.source),
            ConfigEntry::new(
                "tile_attribution",
                &self.tile_attribution.value,
                self.tile_attribution.source,
            ),
            ConfigEntry::new("regions_file", regions_file, self.regions_file.source),
        ]
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// One inspected configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: String,
    pub source: ConfigSource,
}

impl ConfigEntry {
    fn new(key: &'static str, value: impl fmt::Display, source: ConfigSource) -> Self {
        Self { key, value: value.to_string(), source }
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    default_region: Option<String>,
    tile_url: Option<String>,
    tile_attribution: Option<String>,
    regions_file: Option<PathBuf>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub default_region: Option<String>,
    pub regions_file: Option<PathBuf>,
}

fn non_empty_var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        Ok(_) => {
            tracing::warn!("Ignoring empty {}", key);
            None
        }
        Err(_) => None,
    }
}

/// Parse a region name, rejecting blank values
pub fn parse_region_name(s: &str) -> Result<String> {
    let name = s.trim();
    if name.is_empty() {
        return Err(TripmapError::ConfigInvalid {
            key: "default_region".to_string(),
            reason: "Region name must not be empty".to_string(),
        });
    }
    Ok(name.to_string())
}

/// Parse a tile URL template; it must carry the `{z}`, `{x}` and `{y}` placeholders
pub fn parse_tile_url(s: &str) -> Result<String> {
    let url = s.trim();
    let missing: Vec<&str> =
        ["{z}", "{x}", "{y}"].into_iter().filter(|p| !url.contains(p)).collect();
    if url.is_empty() || !missing.is_empty() {
        return Err(TripmapError::ConfigInvalid {
            key: "tile_url".to_string(),
            reason: format!("Invalid tile URL template: '{}'. Missing {}", s, missing.join(", ")),
        });
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.data_dir.value, PathBuf::from("."));
        assert_eq!(config.output_dir.value, PathBuf::from("output"));
        assert_eq!(config.default_region.value, "Singapore");
        assert_eq!(config.default_region.source, ConfigSource::Default);
        assert!(config.tile_url.value.contains("basemaps.cartocdn.com/light_all"));
        assert!(config.regions_file.value.is_none());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
data_dir = "trips"
output_dir = "build"
default_region = "Japan"
tile_url = "https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png"
regions_file = "regions.toml"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.data_dir.value, PathBuf::from("trips"));
        assert_eq!(config.data_dir.source, ConfigSource::File);
        assert_eq!(config.output_dir.value, PathBuf::from("build"));
        assert_eq!(config.default_region.value, "Japan");
        assert_eq!(config.tile_url.value, "https://tile.openstreetmap.org/{z}/{x}/{y}.png");
        assert_eq!(config.tile_attribution.source, ConfigSource::Default);

        let expected = file.path().parent().unwrap().join("regions.toml");
        assert_eq!(config.regions_file.value, Some(expected));
    }

    #[test]
    fn test_file_rejects_bad_tile_url() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"tile_url = "https://example.com/tiles.png""#).unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, TripmapError::ConfigInvalid { ref key, .. } if key == "tile_url"));
    }

    #[test]
    fn test_file_rejects_unknown_key() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"outptu_dir = "typo""#).unwrap();

        assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_optional_file_missing_keeps_defaults() {
        let config = LayeredConfig::with_defaults()
            .load_from_optional_file("/nonexistent/tripmap.toml")
            .unwrap();
        assert_eq!(config.output_dir.source, ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            output_dir: Some(PathBuf::from("dist")),
            default_region: Some("Thailand".to_string()),
            ..Default::default()
        };

        config.update_from_cli(overrides);

        assert_eq!(config.output_dir.value, PathBuf::from("dist"));
        assert_eq!(config.output_dir.source, ConfigSource::Cli);
        assert_eq!(config.default_region.value, "Thailand");
        // These should still be defaults
        assert_eq!(config.data_dir.source, ConfigSource::Default);
        assert_eq!(config.regions_file.source, ConfigSource::Default);
    }

    #[test]
    fn test_parse_tile_url() {
        assert!(parse_tile_url("https://{s}.example.com/{z}/{x}/{y}.png").is_ok());
        assert!(parse_tile_url("https://example.com/{z}/{x}.png").is_err());
        assert!(parse_tile_url("   ").is_err());
    }

    #[test]
    fn test_parse_region_name() {
        assert_eq!(parse_region_name("  Japan ").unwrap(), "Japan");
        assert!(parse_region_name("").is_err());
    }

    #[test]
    fn test_catalog_uses_default_region() {
        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(CliConfigOverrides {
            default_region: Some("Vietnam".to_string()),
            ..Default::default()
        });

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.default_region(), "Vietnam");
        assert_eq!(catalog.lookup("Atlantis").name(), "Vietnam");
    }

    #[test]
    fn test_catalog_rejects_unknown_default() {
        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(CliConfigOverrides {
            default_region: Some("Atlantis".to_string()),
            ..Default::default()
        });

        assert!(matches!(config.catalog(), Err(TripmapError::UnknownDefaultRegion { .. })));
    }

    #[test]
    fn test_entries_order() {
        let config = LayeredConfig::with_defaults();
        let keys: Vec<&str> = config.entries().iter().map(|e| e.key).collect();
        assert_eq!(
            keys,
            vec![
                "data_dir",
                "output_dir",
                "default_region",
                "tile_url",
                "tile_attribution",
                "regions_file",
            ]
        );
        assert_eq!(config.entries()[5].value, "(none)");
    }
}
