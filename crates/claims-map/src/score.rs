//! Fuzzy scoring of source columns against schema fields.
//!
//! Uses Jaro-Winkler similarity on normalized names. Exact matches on the
//! field name score 1.0, exact synonym matches 0.95, and fuzzy synonym
//! matches are discounted slightly so a close name beats a close synonym.

use std::cmp::Ordering;

use rapidfuzz::distance::jaro_winkler;

use crate::schema::SchemaField;

/// Pairs scoring below this are never suggested.
pub const MIN_MAPPING_CONFIDENCE: f64 = 0.8;

const SYNONYM_EXACT: f64 = 0.95;
const SYNONYM_DISCOUNT: f64 = 0.95;

/// Normalizes a column or field name for comparison.
///
/// - Splits camelCase (`claimantId` -> `claimant id`)
/// - Lowercases
/// - Replaces separators with spaces
pub fn normalize(raw: &str) -> String {
    let mut spaced = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for ch in raw.trim().chars() {
        if ch.is_uppercase() && prev_lower {
            spaced.push(' ');
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        spaced.push(ch);
    }
    spaced
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\', '(', ')', '#'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn compact(normalized: &str) -> String {
    normalized.chars().filter(|c| !c.is_whitespace()).collect()
}

fn similarity(a: &str, b: &str) -> f64 {
    jaro_winkler::similarity(a.chars(), b.chars())
}

/// True when the source names the field exactly, ignoring case and punctuation.
pub fn is_perfect_match(source: &str, field: &SchemaField) -> bool {
    let key = compact(&normalize(source));
    !key.is_empty() && key == compact(&normalize(field.name))
}

/// Confidence (0.0 to 1.0) that `source` holds `field`.
pub fn score_column(source: &str, field: &SchemaField) -> f64 {
    let normalized = normalize(source);
    if normalized.is_empty() {
        return 0.0;
    }
    if is_perfect_match(source, field) {
        return 1.0;
    }

    let key = compact(&normalized);
    let label = normalize(field.label);
    if key == compact(&label) {
        return 1.0;
    }

    let mut best = similarity(&normalized, &normalize(field.name)).max(similarity(&normalized, &label));
    for synonym in field.synonyms {
        let synonym = normalize(synonym);
        if key == compact(&synonym) {
            return SYNONYM_EXACT;
        }
        best = best.max(similarity(&normalized, &synonym) * SYNONYM_DISCOUNT);
    }
    best
}

/// One scored (source, target) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub source_index: usize,
    pub field_index: usize,
    pub score: f64,
}

/// Greedy one-to-one assignment by descending score.
///
/// Each source column and each field is used at most once. Ties keep
/// source order, then field order.
pub fn assign_greedy(
    sources: &[String],
    fields: &[SchemaField],
    min_confidence: f64,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for (source_index, source) in sources.iter().enumerate() {
        for (field_index, field) in fields.iter().enumerate() {
            let score = score_column(source, field);
            if score >= min_confidence {
                candidates.push(Candidate {
                    source_index,
                    field_index,
                    score,
                });
            }
        }
    }

    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut used_sources = vec![false; sources.len()];
    let mut used_fields = vec![false; fields.len()];
    let mut assigned = Vec::new();
    for candidate in candidates {
        if used_sources[candidate.source_index] || used_fields[candidate.field_index] {
            continue;
        }
        used_sources[candidate.source_index] = true;
        used_fields[candidate.field_index] = true;
        assigned.push(candidate);
    }
    assigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaType;

    fn field(name: &str) -> &'static SchemaField {
        SchemaType::Claims.field(name).unwrap()
    }

    #[test]
    fn test_normalize_splits_camel_case() {
        assert_eq!(normalize("claimantId"), "claimant id");
        assert_eq!(normalize("ClaimantID"), "claimant id");
        assert_eq!(normalize("member_id"), "member id");
        assert_eq!(normalize("  Paid-Amount ($) "), "paid amount $");
    }

    #[test]
    fn test_exact_match_is_perfect() {
        assert!(is_perfect_match("Claimant_ID", field("claimantId")));
        assert_eq!(score_column("claimant id", field("claimantId")), 1.0);
        assert!(!is_perfect_match("member_id", field("claimantId")));
    }

    #[test]
    fn test_synonym_match() {
        assert_eq!(score_column("Member ID", field("claimantId")), SYNONYM_EXACT);
        assert_eq!(score_column("DOS", field("claimDate")), SYNONYM_EXACT);
    }

    #[test]
    fn test_unrelated_scores_low() {
        assert!(score_column("zzz", field("claimantId")) < MIN_MAPPING_CONFIDENCE);
        assert_eq!(score_column("   ", field("claimantId")), 0.0);
    }

    #[test]
    fn test_greedy_is_one_to_one() {
        let sources = vec!["claim_date".to_string(), "service_date".to_string()];
        let assigned = assign_greedy(&sources, SchemaType::Claims.fields(), MIN_MAPPING_CONFIDENCE);
        let date_targets = assigned
            .iter()
            .filter(|c| SchemaType::Claims.fields()[c.field_index].name == "claimDate")
            .count();
        assert_eq!(date_targets, 1);
        assert_eq!(assigned[0].source_index, 0);
    }
}
