//! Ranked carrier detection.

use std::path::Path;

use claims_model::{CarrierDetectionResult, Row};
use claims_standards::CarrierRegistry;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mapping::suggest_mapping;
use crate::normalize::normalize_key;
use crate::score::score_carrier;

/// Confidence points added when the file name names the carrier.
pub const FILENAME_BOOST: u8 = 10;

/// Detection thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionOptions {
    /// Minimum raw evidence score a carrier needs to be reported.
    pub min_confidence: u32,
    /// Maximum number of candidates returned.
    pub max_candidates: usize,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            min_confidence: 10,
            max_candidates: 3,
        }
    }
}

/// Ranks registry carriers by how well they explain the headers and sample rows.
///
/// Returns at most `max_candidates` results sorted by descending confidence
/// (ties keep registry order). Confidence is relative to the best score of
/// this call, so the top candidate always reports 100. An empty vector means
/// no carrier reached `min_confidence`.
pub fn detect_format(
    registry: &CarrierRegistry,
    headers: &[String],
    sample_rows: &[Row],
    options: &DetectionOptions,
) -> Vec<CarrierDetectionResult> {
    let mut scored: Vec<_> = registry
        .iter()
        .map(|carrier| (carrier, score_carrier(carrier, headers, sample_rows)))
        .filter(|(carrier, score)| {
            debug!(
                carrier = %carrier.name,
                header_score = score.header_score,
                data_score = score.data_score,
                "scored carrier"
            );
            score.total() >= options.min_confidence
        })
        .collect();

    let Some(max_score) = scored.iter().map(|(_, score)| score.total()).max() else {
        return Vec::new();
    };

    scored.sort_by(|a, b| b.1.total().cmp(&a.1.total()));
    scored.truncate(options.max_candidates);

    scored
        .into_iter()
        .map(|(carrier, score)| CarrierDetectionResult {
            carrier: carrier.name.clone(),
            confidence: relative_confidence(score.total(), max_score),
            indicators: score.indicators,
            suggested_mapping: suggest_mapping(carrier, headers),
            date_format: carrier.primary_date_format().map(|f| f.to_string()),
            amount_format: carrier.primary_amount_format().map(|f| f.to_string()),
        })
        .collect()
}

/// [`detect_format`] plus a boost for carriers named in the file name.
///
/// A candidate whose name or alias appears in the file stem gains
/// [`FILENAME_BOOST`] confidence (capped at 100); results are re-sorted.
pub fn detect_format_with_filename(
    registry: &CarrierRegistry,
    file_name: &str,
    headers: &[String],
    sample_rows: &[Row],
    options: &DetectionOptions,
) -> Vec<CarrierDetectionResult> {
    let mut results = detect_format(registry, headers, sample_rows, options);
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let stem_key = normalize_key(&stem);

    for result in &mut results {
        let Some(carrier) = registry.find(&result.carrier) else {
            continue;
        };
        let hit = carrier.names().find(|name| {
            let key = normalize_key(name);
            !key.is_empty() && stem_key.contains(&key)
        });
        if let Some(name) = hit {
            result.confidence = result.confidence.saturating_add(FILENAME_BOOST).min(100);
            result.indicators.push(format!("file name mentions '{name}'"));
        }
    }

    results.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    results
}

fn relative_confidence(score: u32, max_score: u32) -> u8 {
    if max_score == 0 {
        return 0;
    }
    let pct = (f64::from(score) / f64::from(max_score) * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
