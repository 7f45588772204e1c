//! Upload preview: parse, detect and sample a file without storing it.

use std::path::Path;

use claims_detect::detect_format_with_filename;
use claims_model::{CarrierDetectionResult, FieldMapping, Row, ValidationIssue};
use claims_standards::CarrierRegistry;
use claims_validate::{ValidationOptions, validate_data};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, info_span};

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::mapping::{MappingSource, resolve_mapping};
use crate::reader::read_csv_bytes;
use crate::state::{FileState, FileTracker};

/// Hex characters kept from the content digest.
pub const FILE_ID_LEN: usize = 16;

/// Content-derived file identifier: the first 16 hex characters of the
/// SHA-256 of the raw bytes.
pub fn file_id(content: &[u8]) -> String {
    let mut id = hex::encode(Sha256::digest(content));
    id.truncate(FILE_ID_LEN);
    id
}

/// An uploaded file plus an optional caller-supplied mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Upload {
    pub file_name: String,
    pub data: Vec<u8>,
    pub mapping: Option<FieldMapping>,
}

/// What the caller sees after uploading a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// True when the file parsed and a complete mapping is available.
    pub success: bool,
    pub file_id: String,
    pub headers: Vec<String>,
    pub preview_data: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    pub record_count: usize,
    pub errors: Vec<String>,
    pub candidates: Vec<CarrierDetectionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<FieldMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_source: Option<MappingSource>,
    pub state: FileState,
}

impl UploadResponse {
    /// Response for a file that could not be read at all.
    pub fn failed(file_id: impl Into<String>, error: &IngestError) -> Self {
        Self {
            success: false,
            file_id: file_id.into(),
            headers: Vec::new(),
            preview_data: Vec::new(),
            carrier: None,
            confidence: None,
            record_count: 0,
            errors: vec![error.to_string()],
            candidates: Vec::new(),
            mapping: None,
            mapping_source: None,
            state: FileState::Failed,
        }
    }
}

/// One-line rendering of an issue for user-facing lists (1-based rows).
pub fn describe_issue(issue: &ValidationIssue) -> String {
    format!(
        "Row {}: {} ({})",
        issue.row + 1,
        issue.message,
        issue.field
    )
}

/// Parses an upload, ranks carriers and validates the preview rows.
///
/// Structural failures (empty or unparseable file) are `Err`. A missing or
/// incomplete mapping is not: it is listed in `errors` and `success` is
/// false, so the caller can ask the user for a manual mapping.
pub fn preview_upload(
    upload: &Upload,
    registry: &CarrierRegistry,
    config: &IngestConfig,
) -> Result<UploadResponse> {
    let file_id = file_id(&upload.data);
    let span = info_span!("preview_upload", file = %upload.file_name, file_id = %file_id);
    let _guard = span.enter();

    let path = Path::new(&upload.file_name);
    let mut tracker = FileTracker::new(file_id.clone());
    tracker.advance(FileState::Parsing);
    let table = read_csv_bytes(&upload.data, path).inspect_err(|e| tracker.fail(e))?;

    let preview = table.head(config.preview.sample_rows);
    let candidates = detect_format_with_filename(
        registry,
        &upload.file_name,
        &table.headers,
        preview,
        &config.detection,
    );
    tracker.advance(if candidates.is_empty() {
        FileState::FormatUnknown
    } else {
        FileState::FormatKnown
    });

    let mut errors = Vec::new();
    let resolved = match resolve_mapping(path, upload.mapping.clone(), &candidates, &table.headers)
    {
        Ok(resolved) => Some(resolved),
        Err(error) => {
            errors.push(error.to_string());
            None
        }
    };

    if let Some(resolved) = &resolved {
        if resolved.source == MappingSource::Supplied {
            tracker.advance(FileState::MappingConfirmed);
        }
        let options = ValidationOptions {
            max_errors: config.preview.error_limit,
            ..config.validation.clone()
        };
        let result = validate_data(preview, &resolved.mapping, &options);
        errors.extend(result.errors.iter().map(describe_issue));
    }
    errors.truncate(config.preview.error_limit);

    info!(
        rows = table.len(),
        candidates = candidates.len(),
        carrier = resolved.as_ref().and_then(|r| r.carrier.as_deref()),
        "upload previewed"
    );

    Ok(UploadResponse {
        success: resolved.is_some(),
        file_id,
        headers: table.headers.clone(),
        preview_data: preview.to_vec(),
        carrier: resolved
            .as_ref()
            .and_then(|r| r.carrier.clone())
            .or_else(|| candidates.first().map(|c| c.carrier.clone())),
        confidence: resolved
            .as_ref()
            .and_then(|r| r.confidence)
            .or_else(|| candidates.first().map(|c| c.confidence)),
        record_count: table.len(),
        errors,
        mapping_source: resolved.as_ref().map(|r| r.source),
        mapping: resolved.map(|r| r.mapping),
        candidates,
        state: tracker.state(),
    })
}
