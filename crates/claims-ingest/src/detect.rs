//! Carrier detection straight from a file on disk.

use std::path::Path;

use claims_detect::{DetectionOptions, detect_format_with_filename};
use claims_model::CarrierDetectionResult;
use claims_standards::CarrierRegistry;
use tracing::{debug, warn};

use crate::reader::read_csv_file;

/// Reads `path` and ranks carriers using its headers, the first
/// `sample_rows` rows and its file name.
///
/// Read or parse failures are logged and yield no candidates.
pub fn detect_format_from_file(
    path: &Path,
    registry: &CarrierRegistry,
    options: &DetectionOptions,
    sample_rows: usize,
) -> Vec<CarrierDetectionResult> {
    let table = match read_csv_file(path) {
        Ok(table) => table,
        Err(error) => {
            warn!(path = %path.display(), %error, "format detection skipped");
            return Vec::new();
        }
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let results = detect_format_with_filename(
        registry,
        &file_name,
        &table.headers,
        table.head(sample_rows),
        options,
    );
    debug!(
        path = %path.display(),
        candidates = results.len(),
        top = results.first().map(|r| r.carrier.as_str()),
        "detected carrier formats"
    );
    results
}
