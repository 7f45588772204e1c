//! Carrier detection output.

use serde::{Deserialize, Serialize};

use crate::field::FieldMapping;

/// A ranked carrier recommendation for an uploaded file.
///
/// `confidence` is relative to the best-scoring candidate of the same
/// detection call (0-100), not an absolute probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierDetectionResult {
    pub carrier: String,
    pub confidence: u8,
    pub indicators: Vec<String>,
    pub suggested_mapping: FieldMapping,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_format: Option<String>,
}
