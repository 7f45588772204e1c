//! Per-field validation rules.
//!
//! Each rule inspects one raw cell and yields at most one issue. Rules never
//! fail: problems are reported as [`ValidationIssue`]s with error or warning
//! severity.

use std::sync::LazyLock;

use chrono::{Months, NaiveDate};
use claims_model::{CanonicalField, CellValue, ValidationIssue};
use claims_transform::{DateFormat, amount_is_negative, is_amount, parse_amount, parse_date};
use regex::Regex;

use crate::options::ValidationOptions;

pub const MAX_CLAIMANT_ID_LEN: usize = 50;
pub const MAX_AMOUNT: f64 = 1_000_000.0;
pub const MAX_FUTURE_MONTHS: u32 = 12;
pub const MAX_PAST_MONTHS: u32 = 120;

/// ICD-10 (`E11`, `E11.65`).
static ICD10_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\d{2}(\.\d{1,4})?$").expect("Invalid ICD-10 regex"));

/// ICD-9 numeric (`250`, `250.01`).
static ICD9_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}(\.\d{1,2})?$").expect("Invalid ICD-9 regex"));

/// What a rule checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    ClaimantId,
    ClaimDate {
        formats: Vec<DateFormat>,
        reference_date: NaiveDate,
    },
    ServiceType,
    Amount,
    IcdCode,
}

/// A validation rule bound to one canonical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRule {
    pub field: CanonicalField,
    /// Unmapped required fields are reported; unmapped optional ones are skipped.
    pub required: bool,
    pub kind: RuleKind,
}

/// Builds the standard rule set.
pub fn create_validation_rules(options: &ValidationOptions) -> Vec<ValidationRule> {
    let rule = |field, required, kind| ValidationRule {
        field,
        required,
        kind,
    };
    vec![
        rule(CanonicalField::ClaimantId, true, RuleKind::ClaimantId),
        rule(
            CanonicalField::ClaimDate,
            true,
            RuleKind::ClaimDate {
                formats: options.date_formats.clone(),
                reference_date: options.reference_date(),
            },
        ),
        rule(CanonicalField::ServiceType, true, RuleKind::ServiceType),
        rule(CanonicalField::MedicalAmount, false, RuleKind::Amount),
        rule(CanonicalField::PharmacyAmount, false, RuleKind::Amount),
        rule(CanonicalField::TotalAmount, false, RuleKind::Amount),
        rule(CanonicalField::IcdCode, false, RuleKind::IcdCode),
    ]
}

impl ValidationRule {
    /// Checks one raw value. `row` is the index reported in the issue.
    pub fn validate(&self, value: &CellValue, row: usize) -> Option<ValidationIssue> {
        let text = value.as_text();
        let trimmed = text.trim();
        let error = |message: String| Some(ValidationIssue::error(row, self.field, trimmed, message));
        let warning =
            |message: String| Some(ValidationIssue::warning(row, self.field, trimmed, message));

        match &self.kind {
            RuleKind::ClaimantId => {
                if trimmed.is_empty() {
                    error("Claimant ID is required".to_string())
                } else if trimmed.chars().count() > MAX_CLAIMANT_ID_LEN {
                    warning(format!(
                        "Claimant ID is longer than {MAX_CLAIMANT_ID_LEN} characters"
                    ))
                } else {
                    None
                }
            }
            RuleKind::ClaimDate {
                formats,
                reference_date,
            } => {
                if trimmed.is_empty() {
                    return error("Claim date is required".to_string());
                }
                let Some(date) = parse_date(value, formats) else {
                    return error(format!("Unrecognized date format: '{trimmed}'"));
                };
                if reference_date
                    .checked_add_months(Months::new(MAX_FUTURE_MONTHS))
                    .is_some_and(|limit| date > limit)
                {
                    warning("Claim date is more than 1 year in the future".to_string())
                } else if reference_date
                    .checked_sub_months(Months::new(MAX_PAST_MONTHS))
                    .is_some_and(|limit| date < limit)
                {
                    warning("Claim date is more than 10 years in the past".to_string())
                } else {
                    None
                }
            }
            RuleKind::ServiceType => {
                if trimmed.is_empty() {
                    error("Service type is required".to_string())
                } else {
                    None
                }
            }
            RuleKind::Amount => {
                if trimmed.is_empty() {
                    return None;
                }
                let label = self.field.label();
                if !is_amount(value) {
                    warning(format!("{label} is not a number and will be treated as 0"))
                } else if amount_is_negative(value) {
                    warning(format!("{label} is negative; the absolute value is used"))
                } else if parse_amount(value) > MAX_AMOUNT {
                    warning(format!("{label} exceeds 1,000,000"))
                } else {
                    None
                }
            }
            RuleKind::IcdCode => {
                if trimmed.is_empty() || is_valid_icd(trimmed) {
                    None
                } else {
                    warning(format!("'{trimmed}' is not a recognized ICD code"))
                }
            }
        }
    }
}

/// ICD-10 or numeric ICD-9 shape, after trimming and uppercasing.
pub fn is_valid_icd(code: &str) -> bool {
    let code = code.trim().to_uppercase();
    ICD10_REGEX.is_match(&code) || ICD9_REGEX.is_match(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_model::Severity;

    fn rule_for(field: CanonicalField) -> ValidationRule {
        let options = ValidationOptions {
            reference_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..ValidationOptions::default()
        };
        create_validation_rules(&options)
            .into_iter()
            .find(|r| r.field == field)
            .unwrap()
    }

    fn severity(field: CanonicalField, raw: &str) -> Option<Severity> {
        rule_for(field)
            .validate(&CellValue::from(raw), 0)
            .map(|issue| issue.severity)
    }

    #[test]
    fn test_claimant_id() {
        assert_eq!(severity(CanonicalField::ClaimantId, "  "), Some(Severity::Error));
        assert_eq!(severity(CanonicalField::ClaimantId, "A1"), None);
        assert_eq!(
            severity(CanonicalField::ClaimantId, &"x".repeat(51)),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn test_claim_date_range() {
        assert_eq!(severity(CanonicalField::ClaimDate, "01/15/2024"), None);
        assert_eq!(severity(CanonicalField::ClaimDate, "13/40/2024"), Some(Severity::Error));
        assert_eq!(severity(CanonicalField::ClaimDate, ""), Some(Severity::Error));
        assert_eq!(severity(CanonicalField::ClaimDate, "07/01/2025"), Some(Severity::Warning));
        assert_eq!(severity(CanonicalField::ClaimDate, "06/01/2025"), None);
        assert_eq!(severity(CanonicalField::ClaimDate, "05/31/2014"), Some(Severity::Warning));
    }

    #[test]
    fn test_amounts() {
        assert_eq!(severity(CanonicalField::MedicalAmount, ""), None);
        assert_eq!(severity(CanonicalField::MedicalAmount, "$1,200.00"), None);
        assert_eq!(severity(CanonicalField::MedicalAmount, "-$150.00"), Some(Severity::Warning));
        assert_eq!(severity(CanonicalField::PharmacyAmount, "(20.00)"), Some(Severity::Warning));
        assert_eq!(severity(CanonicalField::TotalAmount, "1000000.01"), Some(Severity::Warning));
        assert_eq!(severity(CanonicalField::TotalAmount, "n/a"), Some(Severity::Warning));
    }

    #[test]
    fn test_icd_codes() {
        assert!(is_valid_icd("E11.65"));
        assert!(is_valid_icd(" e11 "));
        assert!(is_valid_icd("250.01"));
        assert!(!is_valid_icd("E1"));
        assert!(!is_valid_icd("250.001"));
        assert_eq!(severity(CanonicalField::IcdCode, "XYZ"), Some(Severity::Warning));
        assert_eq!(severity(CanonicalField::IcdCode, ""), None);
    }

    #[test]
    fn test_service_type() {
        assert_eq!(severity(CanonicalField::ServiceType, ""), Some(Severity::Error));
        assert_eq!(severity(CanonicalField::ServiceType, "Medical"), None);
    }
}
