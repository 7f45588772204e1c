//! Carrier pattern definition.

use std::collections::BTreeMap;

use claims_model::{CanonicalField, FieldMapping};
use claims_transform::{AmountFormat, DateFormat};
use serde::{Deserialize, Serialize};

/// One carrier's claims export layout.
///
/// Patterns are compared against headers after normalization (lowercase,
/// alphanumerics only), so `member_id`, `Member ID` and `MEMBERID` are the
/// same spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierPattern {
    /// Unique identifier, e.g. `"Anthem"`.
    pub name: String,
    /// Other names for the carrier (matched against headers and file names).
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Column names typical of this carrier's export.
    #[serde(default)]
    pub header_patterns: Vec<String>,
    /// Column spellings per canonical field.
    #[serde(default)]
    pub field_patterns: BTreeMap<CanonicalField, Vec<String>>,
    /// Columns present in every genuine export.
    #[serde(default)]
    pub required_columns: Vec<String>,
    /// Ordered date parse hints.
    #[serde(default)]
    pub date_formats: Vec<DateFormat>,
    #[serde(default)]
    pub amount_formats: Vec<AmountFormat>,
    #[serde(default)]
    pub default_mapping: FieldMapping,
}

impl CarrierPattern {
    /// Case-insensitive match on the name or any alias.
    pub fn matches_name(&self, name: &str) -> bool {
        let needle = name.trim();
        self.name.eq_ignore_ascii_case(needle)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(needle))
    }

    /// The name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn patterns_for(&self, field: CanonicalField) -> &[String] {
        self.field_patterns
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// First configured date format, reported as a detection hint.
    pub fn primary_date_format(&self) -> Option<DateFormat> {
        self.date_formats.first().copied()
    }

    /// First configured amount format, reported as a detection hint.
    pub fn primary_amount_format(&self) -> Option<AmountFormat> {
        self.amount_formats.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CarrierPattern {
        CarrierPattern {
            name: "Acme".to_string(),
            aliases: vec!["acme health".to_string()],
            header_patterns: vec!["acme_member".to_string()],
            field_patterns: BTreeMap::from([(
                CanonicalField::ClaimantId,
                vec!["acme_member".to_string()],
            )]),
            required_columns: vec!["acme_member".to_string()],
            date_formats: vec![DateFormat::IsoDate],
            amount_formats: Vec::new(),
            default_mapping: FieldMapping::new().with(CanonicalField::ClaimantId, "acme_member"),
        }
    }

    #[test]
    fn test_matches_name_and_alias() {
        let carrier = sample();
        assert!(carrier.matches_name("ACME"));
        assert!(carrier.matches_name(" Acme Health "));
        assert!(!carrier.matches_name("acmehealth"));
    }

    #[test]
    fn test_format_hints() {
        let carrier = sample();
        assert_eq!(carrier.primary_date_format(), Some(DateFormat::IsoDate));
        assert_eq!(carrier.primary_amount_format(), None);
        assert_eq!(carrier.patterns_for(CanonicalField::ClaimantId).len(), 1);
        assert!(carrier.patterns_for(CanonicalField::Location).is_empty());
    }
}
