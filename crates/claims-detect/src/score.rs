//! Per-carrier evidence scoring.
//!
//! Header evidence and data evidence are scored separately and summed:
//!
//! | Evidence                                   | Points |
//! |--------------------------------------------|--------|
//! | header matches a `header_patterns` entry    | +2 each |
//! | header matches an alias                     | +3 each |
//! | header matches a field's patterns           | +1 per field |
//! | `required_columns` entry in some header     | +10 each |
//! | first-row value has a carrier date shape     | +5 |
//! | first-row value has a carrier amount shape   | +3 |
//!
//! Every pattern comparison is order-insensitive containment on
//! normalized strings.

use claims_model::{CanonicalField, Row};
use claims_standards::CarrierPattern;

use crate::normalize::{contains_either, normalize_key};

pub const HEADER_PATTERN_POINTS: u32 = 2;
pub const ALIAS_POINTS: u32 = 3;
pub const FIELD_PATTERN_POINTS: u32 = 1;
pub const REQUIRED_COLUMN_POINTS: u32 = 10;
pub const DATE_SHAPE_POINTS: u32 = 5;
pub const AMOUNT_SHAPE_POINTS: u32 = 3;

/// Evidence gathered for one carrier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierScore {
    pub header_score: u32,
    pub data_score: u32,
    /// Human-readable evidence, in discovery order.
    pub indicators: Vec<String>,
}

impl CarrierScore {
    pub fn total(&self) -> u32 {
        self.header_score + self.data_score
    }
}

/// Scores one carrier against a file's headers and sample rows.
pub fn score_carrier(carrier: &CarrierPattern, headers: &[String], sample_rows: &[Row]) -> CarrierScore {
    let mut score = CarrierScore::default();
    score_headers(carrier, headers, &mut score);
    score_data(carrier, headers, sample_rows, &mut score);
    score
}

fn score_headers(carrier: &CarrierPattern, headers: &[String], score: &mut CarrierScore) {
    let header_patterns: Vec<String> = carrier.header_patterns.iter().map(|p| normalize_key(p.as_str())).collect();
    let aliases: Vec<String> = carrier.aliases.iter().map(|a| normalize_key(a.as_str())).collect();

    for header in headers {
        let key = normalize_key(header);
        if key.is_empty() {
            continue;
        }

        let pattern_hits = header_patterns
            .iter()
            .filter(|pattern| contains_either(&key, pattern))
            .count() as u32;
        score.header_score += pattern_hits * HEADER_PATTERN_POINTS;

        for alias in aliases.iter().filter(|alias| contains_either(&key, alias)) {
            score.header_score += ALIAS_POINTS;
            score.indicators.push(format!("alias '{alias}' in header '{header}'"));
        }

        for field in CanonicalField::ALL {
            if field_pattern_score(carrier, field, &key) > 0 {
                score.header_score += FIELD_PATTERN_POINTS;
                score.indicators.push(format!("{field} pattern in '{header}'"));
            }
        }
    }
}

fn score_data(carrier: &CarrierPattern, headers: &[String], sample_rows: &[Row], score: &mut CarrierScore) {
    let header_keys: Vec<String> = headers.iter().map(|h| normalize_key(h.as_str())).collect();
    for required in &carrier.required_columns {
        let required_key = normalize_key(required);
        if header_keys.iter().any(|key| contains_either(key, &required_key)) {
            score.data_score += REQUIRED_COLUMN_POINTS;
            score.indicators.push(format!("required column '{required}'"));
        }
    }

    let Some(first) = sample_rows.first() else {
        return;
    };
    for header in headers {
        let value = first.value(header).as_text();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if let Some(format) = carrier.date_formats.iter().find(|f| f.matches_shape(value)) {
            score.data_score += DATE_SHAPE_POINTS;
            score.indicators.push(format!("'{header}' looks like {format}"));
        }
        if let Some(format) = carrier.amount_formats.iter().find(|f| f.matches_shape(value)) {
            score.data_score += AMOUNT_SHAPE_POINTS;
            score.indicators.push(format!("'{header}' looks like a {format} amount"));
        }
    }
}

/// Number of `field` patterns that match a normalized header key.
pub fn field_pattern_score(carrier: &CarrierPattern, field: CanonicalField, header_key: &str) -> usize {
    carrier
        .patterns_for(field)
        .iter()
        .filter(|pattern| contains_either(header_key, &normalize_key(pattern)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_standards::CarrierRegistry;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_required_columns_dominate() {
        let anthem = CarrierRegistry::builtin().find("Anthem").unwrap();
        let score = score_carrier(anthem, &headers(&["member_id", "service_date"]), &[]);
        assert!(score.data_score >= 2 * REQUIRED_COLUMN_POINTS);
        assert!(score.indicators.iter().any(|i| i.contains("required column 'member_id'")));
    }

    #[test]
    fn test_first_row_shapes() {
        let anthem = CarrierRegistry::builtin().find("Anthem").unwrap();
        let cols = headers(&["when", "cost"]);
        let row: Row = [("when", "01/15/2024"), ("cost", "$500.00")].into_iter().collect();
        let score = score_carrier(anthem, &cols, &[row]);
        assert_eq!(score.data_score, DATE_SHAPE_POINTS + AMOUNT_SHAPE_POINTS);
    }

    #[test]
    fn test_only_first_row_counts() {
        let anthem = CarrierRegistry::builtin().find("Anthem").unwrap();
        let cols = headers(&["when"]);
        let blank: Row = [("when", "")].into_iter().collect();
        let dated: Row = [("when", "01/15/2024")].into_iter().collect();
        let score = score_carrier(anthem, &cols, &[blank, dated]);
        assert_eq!(score.data_score, 0);
    }

    #[test]
    fn test_unrelated_headers_score_nothing() {
        let cigna = CarrierRegistry::builtin().find("Cigna").unwrap();
        let score = score_carrier(cigna, &headers(&["foo", "bar"]), &[]);
        assert_eq!(score.total(), 0);
        assert!(score.indicators.is_empty());
    }
}
