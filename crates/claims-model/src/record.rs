//! The canonical normalized claim record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cell::Row;

/// One normalized claim, derived 1:1 from a raw source row.
///
/// `id` is `"{claimant_id}-{row_index}"`. The row index restarts for every
/// file, so ids are only unique within one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    pub id: String,
    pub claimant_id: String,
    /// ISO-8601 calendar date.
    pub claim_date: NaiveDate,
    /// `YYYY-MM` bucket derived from `claim_date`.
    pub month_key: String,
    pub service_type: String,
    pub medical_amount: f64,
    pub pharmacy_amount: f64,
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layman_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Verbatim source row, kept for audit.
    pub original_row: Row,
}

/// Formats the `YYYY-MM` month bucket for a date.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
