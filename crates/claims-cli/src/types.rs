use std::path::PathBuf;

use claims_ingest::{FileState, MappingSource, ProcessResponse, StreamSummary};
use claims_model::{DataQualityStats, ValidationIssue, ValidationResult};

#[derive(Debug)]
pub struct ValidateReport {
    pub file: PathBuf,
    pub carrier: Option<String>,
    pub confidence: Option<u8>,
    pub mapping_source: MappingSource,
    pub result: ValidationResult,
}

#[derive(Debug)]
pub struct IngestReport {
    pub file: PathBuf,
    pub output: PathBuf,
    pub state: FileState,
    pub carrier: Option<String>,
    pub confidence: Option<u8>,
    pub mapping_source: MappingSource,
    pub claims: usize,
    pub stored: usize,
    /// Set in streaming mode.
    pub chunks: Option<usize>,
    pub stats: DataQualityStats,
    pub errors: Vec<ValidationIssue>,
    pub issue_count: usize,
}

impl IngestReport {
    pub fn from_batch(file: PathBuf, output: PathBuf, response: ProcessResponse) -> Self {
        Self {
            file,
            output,
            state: response.state,
            carrier: response.carrier,
            confidence: response.confidence,
            mapping_source: response.mapping_source,
            claims: response.total_claims,
            stored: response.stored,
            chunks: None,
            stats: response.stats,
            errors: response.errors,
            issue_count: response.issue_count,
        }
    }

    pub fn from_stream(file: PathBuf, output: PathBuf, summary: StreamSummary) -> Self {
        Self {
            file,
            output,
            state: summary.state,
            carrier: summary.carrier,
            confidence: summary.confidence,
            mapping_source: summary.mapping_source,
            claims: summary.valid_claims,
            stored: summary.stored,
            chunks: Some(summary.chunks),
            stats: summary.stats,
            errors: summary.errors,
            issue_count: summary.issue_count,
        }
    }

    pub fn is_stored(&self) -> bool {
        self.state == FileState::Stored
    }
}
