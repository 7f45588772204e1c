//! Streaming mode: process a file chunk by chunk with progress events.
//!
//! Each chunk is validated and normalized on its own (duplicate detection is
//! therefore chunk-local) and its claims are stored before the next chunk is
//! read. Chunk results are merged into a file-level result whose issue list
//! is capped at `validation.max_errors`.
//!
//! The issue budget carries across chunks: a chunk is validated with only
//! what earlier chunks left of `max_errors`, and once nothing is left the
//! remaining chunks are normalized and stored without validation. The
//! file-level statistics therefore match a batch run of the same file.

use std::io::Read;
use std::path::Path;

use claims_detect::detect_format_with_filename;
use claims_model::{DataQualityStats, FieldMapping, ValidationIssue, ValidationResult};
use claims_standards::CarrierRegistry;
use claims_validate::{ValidationOptions, normalize_data, validate_data};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::mapping::{MappingSource, ResolvedMapping, resolve_mapping};
use crate::reader::CsvRowReader;
use crate::sink::ClaimSink;
use crate::state::{FileState, FileTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressKind {
    Progress,
    Complete,
    Error,
}

/// A progress notification, serialized as a server-sent event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub kind: ProgressKind,
    /// Data rows read so far.
    pub processed: usize,
    /// Expected data rows, when the caller knows them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    pub valid_claims: usize,
    /// Error-severity issues so far.
    pub errors: usize,
    /// Percentage of `total` processed; 0 while unknown, 100 on completion.
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProgressEvent {
    /// `data: {json}` followed by the blank line ending an SSE frame.
    pub fn to_sse_frame(&self) -> serde_json::Result<String> {
        Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
    }
}

/// Input for [`process_stream`].
#[derive(Debug)]
pub struct StreamRequest<R> {
    pub file_name: String,
    pub reader: R,
    /// Confirmed mapping; detected from the first chunk when absent.
    pub mapping: Option<FieldMapping>,
    /// Expected number of data rows, used for the progress percentage.
    pub total_rows: Option<usize>,
}

/// Outcome of [`process_stream`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSummary {
    pub file_name: String,
    pub processed: usize,
    pub chunks: usize,
    pub valid_claims: usize,
    pub stored: usize,
    /// The first issues (see `preview.error_limit`).
    pub errors: Vec<ValidationIssue>,
    /// Issues kept in the merged result before truncation to `errors`.
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

#[derive(Debug, Default)]
struct Counters {
    processed: usize,
    total: Option<usize>,
    valid_claims: usize,
    errors: usize,
}

impl Counters {
    fn event(&self, kind: ProgressKind) -> ProgressEvent {
        let progress = match (kind, self.total) {
            (ProgressKind::Complete, _) => 100,
            (_, Some(0)) => 100,
            (_, Some(total)) => ((self.processed * 100) / total).min(100) as u8,
            (_, None) => 0,
        };
        ProgressEvent {
            kind,
            processed: self.processed,
            total: self.total,
            valid_claims: self.valid_claims,
            errors: self.errors,
            progress,
            message: None,
        }
    }
}

/// Processes a CSV stream in chunks of `streaming.chunk_size` rows.
///
/// `on_event` receives one `progress` event per chunk, then a single
/// `complete` event, or an `error` event right before an `Err` is returned.
pub fn process_stream<R: Read>(
    request: StreamRequest<R>,
    registry: &CarrierRegistry,
    sink: &mut dyn ClaimSink,
    config: &IngestConfig,
    mut on_event: impl FnMut(&ProgressEvent),
) -> Result<StreamSummary> {
    let span = info_span!("process_stream", file = %request.file_name);
    let _guard = span.enter();

    let mut tracker = FileTracker::new(request.file_name.clone());
    let mut counters = Counters {
        total: request.total_rows,
        ..Counters::default()
    };

    match run(
        request,
        registry,
        sink,
        config,
        &mut tracker,
        &mut counters,
        &mut on_event,
    ) {
        Ok(summary) => {
            on_event(&counters.event(ProgressKind::Complete));
            Ok(summary)
        }
        Err(error) => {
            tracker.fail(&error);
            on_event(&ProgressEvent {
                message: Some(error.to_string()),
                ..counters.event(ProgressKind::Error)
            });
            Err(error)
        }
    }
}

fn run<R: Read>(
    request: StreamRequest<R>,
    registry: &CarrierRegistry,
    sink: &mut dyn ClaimSink,
    config: &IngestConfig,
    tracker: &mut FileTracker,
    counters: &mut Counters,
    on_event: &mut impl FnMut(&ProgressEvent),
) -> Result<StreamSummary> {
    let StreamRequest {
        file_name,
        reader,
        mapping,
        ..
    } = request;
    let path = Path::new(&file_name);
    let chunk_size = config.streaming.chunk_size.max(1);

    tracker.advance(FileState::Parsing);
    let mut reader = CsvRowReader::new(reader, path)?;
    let headers = reader.headers().to_vec();
    let mut chunk = reader.next_chunk(chunk_size)?;
    if chunk.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let sample = &chunk[..chunk.len().min(config.preview.sample_rows)];
    let candidates =
        detect_format_with_filename(registry, &file_name, &headers, sample, &config.detection);
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
    } = resolve_mapping(path, mapping, &candidates, &headers)?;
    tracker.advance(FileState::MappingConfirmed);
    tracker.advance(FileState::Validating);

    let max_errors = config.validation.max_errors;
    let mut result = ValidationResult::default();
    let mut stored = 0;
    let mut chunks = 0;

    while !chunk.is_empty() {
        let validation = config.validation_at(counters.processed);
        let remaining = max_errors.saturating_sub(result.errors.len());
        let chunk_result = if remaining > 0 {
            let budget = ValidationOptions {
                max_errors: remaining,
                ..validation.clone()
            };
            validate_data(&chunk, &mapping, &budget)
        } else {
            ValidationResult::default()
        };
        let records = normalize_data(&chunk, &mapping, &config.normalize_options(&validation));

        if !records.is_empty() {
            if tracker.state() == FileState::Validating {
                tracker.advance(FileState::Normalizing);
            }
            stored += sink.store(&records)?;
        }

        chunks += 1;
        counters.processed += chunk.len();
        counters.valid_claims += records.len();
        counters.errors += chunk_result.error_count();
        debug!(
            chunk = chunks,
            rows = chunk.len(),
            claims = records.len(),
            issues = chunk_result.errors.len(),
            "processed chunk"
        );
        result.merge(chunk_result, max_errors);
        on_event(&counters.event(ProgressKind::Progress));

        chunk = reader.next_chunk(chunk_size)?;
    }

    sink.finish()?;
    tracker.advance(if tracker.state() == FileState::Normalizing {
        FileState::Stored
    } else {
        FileState::Reported
    });

    info!(
        rows = counters.processed,
        chunks,
        claims = counters.valid_claims,
        stored,
        state = %tracker.state(),
        "stream processed"
    );

    let ValidationResult { mut errors, stats } = result;
    let issue_count = errors.len();
    errors.truncate(config.preview.error_limit);

    Ok(StreamSummary {
        file_name,
        processed: counters.processed,
        chunks,
        valid_claims: counters.valid_claims,
        stored,
        errors,
        issue_count,
        stats,
        mapping,
        mapping_source: source,
        carrier,
        confidence,
        state: tracker.state(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sse_frame() {
        let counters = Counters {
            processed: 50,
            total: Some(200),
            valid_claims: 48,
            errors: 2,
        };
        let frame = counters.event(ProgressKind::Progress).to_sse_frame().unwrap();
        assert_eq!(
            frame,
            "data: {\"type\":\"progress\",\"processed\":50,\"total\":200,\"validClaims\":48,\"errors\":2,\"progress\":25}\n\n"
        );
    }

    #[test]
    fn test_progress_without_total() {
        let counters = Counters {
            processed: 10,
            ..Counters::default()
        };
        assert_eq!(counters.event(ProgressKind::Progress).progress, 0);
        assert_eq!(counters.event(ProgressKind::Complete).progress, 100);
    }
}
