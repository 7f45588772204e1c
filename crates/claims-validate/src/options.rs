//! Options for validation and normalization passes.

use chrono::NaiveDate;
use claims_transform::DateFormat;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ERRORS: usize = 1000;

/// Options for [`validate_data`](crate::validate_data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Validation stops before the next row once this many issues were collected.
    pub max_errors: usize,
    /// Date parse order; empty means the default list.
    pub date_formats: Vec<DateFormat>,
    /// "Today" for the claim date range checks; `None` uses the local date.
    pub reference_date: Option<NaiveDate>,
    /// Added to every reported row index (for chunked input).
    pub row_offset: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_errors: DEFAULT_MAX_ERRORS,
            date_formats: Vec::new(),
            reference_date: None,
            row_offset: 0,
        }
    }
}

impl ValidationOptions {
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Options for [`normalize_data`](crate::normalize_data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Drop rows that cannot be normalized silently; otherwise log each one.
    pub skip_invalid_rows: bool,
    pub date_formats: Vec<DateFormat>,
    /// Added to row indexes (and therefore to record ids).
    pub row_offset: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            skip_invalid_rows: true,
            date_formats: Vec::new(),
            row_offset: 0,
        }
    }
}
