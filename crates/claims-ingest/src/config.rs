//! Ingestion configuration.
//!
//! Loaded from a TOML file; every section and field is optional.
//!
//! ```toml
//! extra_carriers = "carriers.toml"
//!
//! [detection]
//! min_confidence = 10
//! max_candidates = 3
//!
//! [validation]
//! max_errors = 1000
//! date_formats = ["MM/DD/YYYY", "YYYY-MM-DD"]
//!
//! [normalization]
//! skip_invalid_rows = true
//!
//! [streaming]
//! chunk_size = 500
//!
//! [preview]
//! sample_rows = 10
//! claims_preview = 100
//! error_limit = 20
//! ```

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use claims_detect::DetectionOptions;
use claims_standards::CarrierRegistry;
use claims_validate::{NormalizeOptions, ValidationOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::reader::read_file;

/// Rows per chunk in streaming mode.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Maximum entries in a user-facing error list.
pub const DEFAULT_ERROR_LIMIT: usize = 20;

/// Chunking for [`process_stream`](crate::process_stream).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingOptions {
    pub chunk_size: usize,
}

impl Default for StreamingOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Sizes of the slices handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewOptions {
    /// Rows used for detection and returned as upload preview data.
    pub sample_rows: usize,
    /// Normalized claims echoed back by a batch run.
    pub claims_preview: usize,
    /// Entries in user-facing error lists.
    pub error_limit: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            sample_rows: 10,
            claims_preview: 100,
            error_limit: DEFAULT_ERROR_LIMIT,
        }
    }
}

/// Complete ingestion configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Carrier file appended to the built-in registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_carriers: Option<PathBuf>,
    pub detection: DetectionOptions,
    pub validation: ValidationOptions,
    pub normalization: NormalizeOptions,
    pub streaming: StreamingOptions,
    pub preview: PreviewOptions,
}

impl IngestConfig {
    /// Parses configuration text. `path` names the source in errors.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| IngestError::Config {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Loads a configuration file.
    ///
    /// A relative `extra_carriers` path is resolved against the directory of
    /// the configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = read_file(path)?;
        let content = String::from_utf8(bytes).map_err(|e| IngestError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut config = Self::from_toml_str(&content, path)?;

        if let (Some(extra), Some(dir)) = (config.extra_carriers.as_mut(), path.parent())
            && extra.is_relative()
        {
            *extra = dir.join(&*extra);
        }
        debug!(path = %path.display(), "loaded ingestion configuration");
        Ok(config)
    }

    /// The carrier registry this configuration describes.
    pub fn registry(&self) -> Result<Cow<'static, CarrierRegistry>> {
        let builtin = CarrierRegistry::builtin();
        match &self.extra_carriers {
            Some(path) => Ok(Cow::Owned(builtin.with_carriers_from_path(path)?)),
            None => Ok(Cow::Borrowed(builtin)),
        }
    }

    /// Validation options shifted to start at `row_offset`.
    pub fn validation_at(&self, row_offset: usize) -> ValidationOptions {
        ValidationOptions {
            row_offset,
            ..self.validation.clone()
        }
    }

    /// Normalization options matching `validation`: same row offset, and
    /// its date formats when none are configured for normalization.
    pub fn normalize_options(&self, validation: &ValidationOptions) -> NormalizeOptions {
        let mut options = NormalizeOptions {
            row_offset: validation.row_offset,
            ..self.normalization.clone()
        };
        if options.date_formats.is_empty() {
            options.date_formats.clone_from(&validation.date_formats);
        }
        options
    }
}
