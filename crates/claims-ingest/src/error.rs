//! Error types for claims file ingestion.

use std::path::PathBuf;

use claims_model::CanonicalField;
use claims_standards::RegistryError;
use thiserror::Error;

/// Errors that stop a file from being ingested at all.
///
/// Row-level data problems are never reported here; they travel as
/// [`ValidationIssue`](claims_model::ValidationIssue)s in the response.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// CSV file is empty or has no data rows.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    // === Mapping Errors ===
    /// Detection found no carrier and no usable mapping could be derived.
    #[error("no usable column mapping for {path}; a manual mapping is required")]
    MappingRequired { path: PathBuf },

    /// The mapping lacks fields needed for normalization.
    #[error("mapping for {path} is missing required fields: {}", field_list(.missing))]
    IncompleteMapping {
        path: PathBuf,
        missing: Vec<CanonicalField>,
    },

    // === Output Errors ===
    /// The claim sink rejected a batch.
    #[error("failed to store claims: {source}")]
    Sink {
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Configuration file is not valid.
    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Extra carrier patterns could not be loaded.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn field_list(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(CanonicalField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
