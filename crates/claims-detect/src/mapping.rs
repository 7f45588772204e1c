//! Suggested column mapping for a detected carrier.

use std::collections::BTreeMap;

use claims_model::{CanonicalField, FieldMapping};
use claims_standards::CarrierPattern;

use crate::normalize::normalize_key;
use crate::score::field_pattern_score;

/// Builds the mapping suggested for `carrier` given the actual headers.
///
/// The carrier's default mapping is resolved against the headers first
/// (entries naming an absent column are dropped). Each field is then
/// re-pointed at whichever free header scores strictly higher on the field's
/// patterns than the currently mapped one. A header already mapped to a
/// different field is never reused.
pub fn suggest_mapping(carrier: &CarrierPattern, headers: &[String]) -> FieldMapping {
    let keys: Vec<String> = headers.iter().map(|h| normalize_key(h)).collect();
    let mut mapping = FieldMapping::new();
    let mut current: BTreeMap<CanonicalField, usize> = BTreeMap::new();

    for (field, column) in carrier.default_mapping.iter() {
        let wanted = normalize_key(column);
        if let Some(idx) = keys.iter().position(|key| !key.is_empty() && *key == wanted) {
            mapping.set(field, headers[idx].clone());
            current.insert(field, field_pattern_score(carrier, field, &keys[idx]));
        }
    }

    for field in CanonicalField::ALL {
        if carrier.patterns_for(field).is_empty() {
            continue;
        }
        let mut best_score = current.get(&field).copied().unwrap_or(0);
        let mut best_header: Option<usize> = None;

        for (idx, header) in headers.iter().enumerate() {
            if is_taken_by_other(&mapping, field, header) {
                continue;
            }
            let score = field_pattern_score(carrier, field, &keys[idx]);
            if score > best_score {
                best_score = score;
                best_header = Some(idx);
            }
        }

        if let Some(idx) = best_header {
            mapping.set(field, headers[idx].clone());
            current.insert(field, best_score);
        }
    }

    mapping
}

fn is_taken_by_other(mapping: &FieldMapping, field: CanonicalField, header: &str) -> bool {
    mapping
        .iter()
        .any(|(other, column)| other != field && column == header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_standards::CarrierRegistry;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_mapping_resolved_against_headers() {
        let anthem = CarrierRegistry::builtin().find("Anthem").unwrap();
        let mapping = suggest_mapping(anthem, &headers(&["Member ID", "Service Date"]));
        assert_eq!(mapping.get(CanonicalField::ClaimantId), Some("Member ID"));
        assert_eq!(mapping.get(CanonicalField::ClaimDate), Some("Service Date"));
        assert!(!mapping.contains(CanonicalField::ServiceType));
    }

    #[test]
    fn test_pattern_override_fills_absent_default() {
        let uhc = CarrierRegistry::builtin().find("UnitedHealthcare").unwrap();
        let mapping = suggest_mapping(uhc, &headers(&["member_id", "service_date"]));
        assert_eq!(mapping.get(CanonicalField::ClaimantId), Some("member_id"));
        assert_eq!(mapping.get(CanonicalField::ClaimDate), Some("service_date"));
    }

    #[test]
    fn test_header_not_reused_across_fields() {
        let anthem = CarrierRegistry::builtin().find("Anthem").unwrap();
        let mapping = suggest_mapping(anthem, &headers(&["paid_amount"]));
        assert_eq!(mapping.get(CanonicalField::MedicalAmount), Some("paid_amount"));
        assert!(!mapping.contains(CanonicalField::PharmacyAmount));
    }
}
