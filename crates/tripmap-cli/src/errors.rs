use console::style;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tripmap_core::TripmapError;

/// Enhanced error type with suggestions
#[derive(Serialize)]
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }

    pub fn display_json(&self) {
        let output = serde_json::json!({
            "status": "error",
            "error": self,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(text) => eprintln!("{}", text),
            Err(_) => eprintln!("{}", self.message),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for a missing places table
pub fn source_not_found(path: &Path) -> CliError {
    CliError::new("Places file not found")
        .with_context(format!("The places table does not exist.\n\nPath: {}", path.display()))
        .with_suggestion("Check the file path and try again")
        .with_suggestion("Or put a <country>_places.csv file under <country>/data/")
        .with_help("Run: tripmap generate --help")
}

/// Create error for a table without usable rows
pub fn empty_dataset(path: &Path) -> CliError {
    CliError::new("No locations found")
        .with_context(format!(
            "The places table has no rows with usable coordinates.\n\nPath: {}",
            path.display()
        ))
        .with_suggestion("Add at least one row with Name, Latitude and Longitude")
        .with_suggestion("Check skipped-row warnings for unparsable coordinates")
        .with_help("Run: tripmap zones --help")
}

/// Create error for a table missing a required header
pub fn missing_column(path: &Path, column: &str) -> CliError {
    CliError::new(format!("Missing column: {}", column))
        .with_context(format!(
            "The places table must have Name, Latitude and Longitude headers \
             (case-sensitive).\n\nPath: {}",
            path.display()
        ))
        .with_suggestion(format!("Add a '{}' column to the header row", column))
        .with_help("Run: tripmap generate --help")
}

/// Create error for an empty data directory
pub fn no_countries(data_dir: &Path) -> CliError {
    CliError::new("No countries found")
        .with_context(format!(
            "No folder with a data/ subfolder was found.\n\nData directory: {}",
            data_dir.display()
        ))
        .with_suggestion("Create <country>/data/<country>_places.csv under the data directory")
        .with_suggestion("Or point at another directory: tripmap --data-dir <DIR> countries")
        .with_suggestion("Or pass a table directly: tripmap generate <COUNTRY> --input <CSV>")
        .with_help("Run: tripmap countries --help")
}

/// Create error for a country folder without a places table
pub fn no_places_file(country: &str, data_dir: &Path) -> CliError {
    CliError::new(format!("No places table for {}", country))
        .with_context(format!(
            "Expected a file matching *_places.csv.\n\nLooked in: {}",
            data_dir.display()
        ))
        .with_suggestion("Add a <country>_places.csv file to that folder")
        .with_suggestion("Or pass a table directly with --input <CSV>")
        .with_help("Run: tripmap generate --help")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check tripmap.toml for syntax errors")
        .with_suggestion("Check TRIPMAP_* environment variables")
        .with_help("Run: tripmap config")
}

/// Create error for artifacts that could not be written
pub fn artifacts_failed(failed: &[String]) -> CliError {
    CliError::new("Some artifacts were not written")
        .with_context(failed.join("\n"))
        .with_suggestion("Check that the output directory is writable")
        .with_suggestion("Or choose another one: tripmap generate --output-dir <DIR>")
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let error = match error.downcast::<CliError>() {
        Ok(cli_error) => return cli_error,
        Err(error) => error,
    };

    match error.chain().find_map(|cause| cause.downcast_ref::<TripmapError>()) {
        Some(TripmapError::SourceNotFound { path }) => source_not_found(path),
        Some(TripmapError::EmptyDataset { path }) => empty_dataset(path),
        Some(TripmapError::MissingColumn { path, column }) => missing_column(path, column),
        Some(TripmapError::ConfigInvalid { key, reason }) => invalid_config(key, reason),
        Some(TripmapError::UnknownDefaultRegion { name }) => {
            CliError::new(format!("Unknown default region: {}", name))
                .with_suggestion("Pick one of the regions listed by: tripmap regions")
                .with_help("Run: tripmap regions")
        }
        Some(other) => CliError::new(other.to_string()),
        None => {
            let message = format!("{:#}", error);
            if message.contains("permission denied") || message.contains("Permission denied") {
                CliError::new("Permission denied")
                    .with_context(format!("Error: {}", message))
                    .with_suggestion("Check file permissions")
            } else {
                CliError::new(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_core_error_maps_through_context() {
        let err: anyhow::Result<()> = Err(TripmapError::EmptyDataset {
            path: PathBuf::from("japan_places.csv"),
        })
        .context("Failed to load places");

        let cli_error = from_anyhow(err.unwrap_err());
        assert_eq!(cli_error.message, "No locations found");
        assert!(cli_error.context.unwrap().contains("japan_places.csv"));
    }

    #[test]
    fn test_cli_error_passes_through() {
        let err = anyhow::Error::new(no_countries(Path::new("/trips")));
        let cli_error = from_anyhow(err);
        assert_eq!(cli_error.message, "No countries found");
        assert_eq!(cli_error.suggestions.len(), 3);
    }

    #[test]
    fn test_plain_error_keeps_message() {
        let cli_error = from_anyhow(anyhow::anyhow!("something odd"));
        assert_eq!(cli_error.message, "something odd");
        assert!(cli_error.suggestions.is_empty());
    }
}
