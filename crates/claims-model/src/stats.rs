//! Aggregate data-quality statistics for one validation pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::CanonicalField;
use crate::issue::{Severity, ValidationIssue};

/// Counters gathered while validating a batch of rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityStats {
    pub row_count: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub missing_required: BTreeMap<CanonicalField, usize>,
    pub invalid_dates: usize,
    pub duplicate_ids: usize,
    /// `valid_rows / row_count` as a percentage, rounded to 2 decimals.
    pub data_completeness: f64,
}

impl DataQualityStats {
    /// Recomputes `data_completeness` from the row counters.
    pub fn finalize(&mut self) {
        self.data_completeness = completeness(self.valid_rows, self.row_count);
    }

    /// Adds another chunk's counters to this one.
    pub fn merge(&mut self, other: &DataQualityStats) {
        self.row_count += other.row_count;
        self.valid_rows += other.valid_rows;
        self.invalid_rows += other.invalid_rows;
        self.invalid_dates += other.invalid_dates;
        self.duplicate_ids += other.duplicate_ids;
        for (field, count) in &other.missing_required {
            *self.missing_required.entry(*field).or_insert(0) += count;
        }
        self.finalize();
    }

    pub fn missing_count(&self, field: CanonicalField) -> usize {
        self.missing_required.get(&field).copied().unwrap_or(0)
    }
}

/// Percentage of `valid` over `total`, rounded to 2 decimals; 0 for empty input.
pub fn completeness(valid: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = valid as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Issues plus statistics for one validation call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub stats: DataQualityStats,
}

impl ValidationResult {
    pub fn error_count(&self) -> usize {
        self.errors
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.errors
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Folds a chunk-local result into this one.
    ///
    /// Counters are summed; issues are appended until `max_issues` is reached.
    pub fn merge(&mut self, other: ValidationResult, max_issues: usize) {
        self.stats.merge(&other.stats);
        let room = max_issues.saturating_sub(self.errors.len());
        self.errors.extend(other.errors.into_iter().take(room));
    }
}
