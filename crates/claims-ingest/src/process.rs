//! Batch mode: validate, normalize and store a whole file at once.

use std::path::Path;

use claims_detect::detect_format_with_filename;
use claims_model::{ClaimRecord, DataQualityStats, FieldMapping, ValidationIssue};
use claims_standards::CarrierRegistry;
use claims_validate::{ValidationOptions, normalize_data, validate_data};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::config::IngestConfig;
use crate::error::Result;
use crate::mapping::{MappingSource, ResolvedMapping, resolve_mapping};
use crate::reader::read_csv_bytes;
use crate::sink::ClaimSink;
use crate::state::{FileState, FileTracker};
use crate::upload::file_id;

/// A full-file processing request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessRequest {
    /// Id returned by the preview step; recomputed from `data` when absent.
    pub file_id: Option<String>,
    pub file_name: String,
    pub data: Vec<u8>,
    /// Confirmed mapping; detected when absent.
    pub mapping: Option<FieldMapping>,
    /// Overrides the configured validation options.
    pub options: Option<ValidationOptions>,
}

/// Outcome of [`process_file`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub file_id: String,
    /// The first normalized claims (see `preview.claims_preview`).
    pub claims: Vec<ClaimRecord>,
    pub total_claims: usize,
    pub stored: usize,
    /// The first issues (see `preview.error_limit`).
    pub errors: Vec<ValidationIssue>,
    /// Issues found before truncation to `errors`.
    pub issue_count: usize,
    pub stats: DataQualityStats,
    pub mapping: FieldMapping,
    pub mapping_source: MappingSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    pub state: FileState,
}

/// Validates, normalizes and stores a whole file.
///
/// When no row yields a claim the file ends in [`FileState::Reported`] and
/// the sink is not called; otherwise the claims are stored and the file ends
/// in [`FileState::Stored`]. Structural and mapping failures are `Err`.
pub fn process_file(
    request: &ProcessRequest,
    registry: &CarrierRegistry,
    sink: &mut dyn ClaimSink,
    config: &IngestConfig,
) -> Result<ProcessResponse> {
    let file_id = file_id(&request.data);
    if let Some(expected) = &request.file_id
        && *expected != file_id
    {
        warn!(expected = %expected, actual = %file_id, "file id does not match content");
    }
    let span = info_span!("process_file", file = %request.file_name, file_id = %file_id);
    let _guard = span.enter();

    let mut tracker = FileTracker::new(file_id.clone());
    run(request, registry, sink, config, &mut tracker).inspect_err(|e| tracker.fail(e))
}

fn run(
    request: &ProcessRequest,
    registry: &CarrierRegistry,
    sink: &mut dyn ClaimSink,
    config: &IngestConfig,
    tracker: &mut FileTracker,
) -> Result<ProcessResponse> {
    let path = Path::new(&request.file_name);
    tracker.advance(FileState::Parsing);
    let table = read_csv_bytes(&request.data, path)?;

    let candidates = detect_format_with_filename(
        registry,
        &request.file_name,
        &table.headers,
        table.head(config.preview.sample_rows),
        &config.detection,
    );
    tracker.advance(if candidates.is_empty() {
        FileState::FormatUnknown
    } else {
        FileState::FormatKnown
    });

    let ResolvedMapping {
        mapping,
        source,
        carrier,
        confidence,
    } = resolve_mapping(path, request.mapping.clone(), &candidates, &table.headers)?;
    tracker.advance(FileState::MappingConfirmed);

    tracker.advance(FileState::Validating);
    let validation = request
        .options
        .clone()
        .unwrap_or_else(|| config.validation.clone());
    let result = validate_data(&table.rows, &mapping, &validation);
    let records = normalize_data(
        &table.rows,
        &mapping,
        &config.normalize_options(&validation),
    );

    let stored = if records.is_empty() {
        tracker.advance(FileState::Reported);
        0
    } else {
        tracker.advance(FileState::Normalizing);
        let stored = sink.store(&records)?;
        sink.finish()?;
        tracker.advance(FileState::Stored);
        stored
    };

    info!(
        rows = table.len(),
        valid_rows = result.stats.valid_rows,
        claims = records.len(),
        stored,
        issues = result.errors.len(),
        state = %tracker.state(),
        "file processed"
    );

    let issue_count = result.errors.len();
    let mut errors = result.errors;
    errors.truncate(config.preview.error_limit);
    let total_claims = records.len();
    let mut claims = records;
    claims.truncate(config.preview.claims_preview);

    Ok(ProcessResponse {
        file_id: tracker.file_id().to_string(),
        claims,
        total_claims,
        stored,
        errors,
        issue_count,
        stats: result.stats,
        mapping,
        mapping_source: source,
        carrier,
        confidence,
        state: tracker.state(),
    })
}
