//! Error types for mapping operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from interactive mapping edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Target field not part of the schema.
    #[error("Field not found in {schema} schema: {field}")]
    FieldNotFound { schema: String, field: String },

    /// Column not present in the source file.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

/// Errors from saving or loading mapping preferences.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreferenceError {
    /// Failed to read or write the preference file.
    #[error("Failed to access preferences {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Preference file is not valid JSON.
    #[error("Invalid preferences in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
