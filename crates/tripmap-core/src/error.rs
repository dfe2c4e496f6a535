//! Error types for tripmap

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TripmapError {
    // Source errors
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("No locations found in {path}")]
    EmptyDataset { path: PathBuf },

    #[error("Source {path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Failed to read source {path}: {reason}")]
    SourceRead { path: PathBuf, reason: String },

    // Catalog errors
    #[error("Region '{name}' must define at least one zone")]
    EmptyRegion { name: String },

    #[error("Region '{region}' defines zone {field} '{value}' more than once")]
    DuplicateZone {
        region: String,
        field: String,
        value: String,
    },

    #[error("Default region '{name}' is not in the catalog")]
    UnknownDefaultRegion { name: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Output errors
    #[error("Failed to render {artifact}: {reason}")]
    Render { artifact: String, reason: String },

    #[error("Failed to write {path}: {reason}")]
    ArtifactWrite { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, TripmapError>;
