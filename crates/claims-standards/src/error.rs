//! Error types for carrier registry loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when building a carrier registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// Carrier file not found.
    #[error("Carrier file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read carrier file.
    #[error("Failed to read carrier file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Carrier data is not valid TOML or has the wrong shape.
    #[error("Invalid carrier data in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// A carrier entry has an empty name.
    #[error("Carrier #{index} in {origin} has an empty name")]
    EmptyName { origin: String, index: usize },

    /// Two carriers share a name (case-insensitive).
    #[error("Duplicate carrier name '{name}' in {origin}")]
    DuplicateName { origin: String, name: String },
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
