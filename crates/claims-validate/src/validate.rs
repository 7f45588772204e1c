//! Row and batch validation.

use std::collections::HashSet;

use claims_model::{
    CanonicalField, DataQualityStats, FieldMapping, Row, ValidationIssue, ValidationResult,
};
use claims_transform::parse_date;
use tracing::debug;

use crate::options::ValidationOptions;
use crate::rules::{ValidationRule, create_validation_rules};

/// Fields counted in `missingRequired` statistics.
pub const REQUIRED_FIELDS: [CanonicalField; 5] = [
    CanonicalField::ClaimantId,
    CanonicalField::ClaimDate,
    CanonicalField::ServiceType,
    CanonicalField::MedicalAmount,
    CanonicalField::PharmacyAmount,
];

/// Validates one row.
///
/// A required field with no mapped column yields exactly one
/// `"<field> is not mapped"` error; unmapped optional fields are skipped.
/// A mapped column missing from the row is validated as null.
pub fn validate_row(
    row: &Row,
    index: usize,
    mapping: &FieldMapping,
    rules: &[ValidationRule],
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for rule in rules {
        match mapping.get(rule.field) {
            None if rule.required => issues.push(ValidationIssue::error(
                index,
                rule.field,
                "",
                format!("{} is not mapped", rule.field),
            )),
            None => {}
            Some(column) => issues.extend(rule.validate(row.value(column), index)),
        }
    }
    issues
}

/// Validates a batch of rows and gathers data-quality statistics.
///
/// Stops before the next row once `max_errors` issues were collected; the
/// returned list is capped at `max_errors` and the statistics cover only the
/// rows processed up to that point. Duplicate claimant ids are tracked within
/// this call only.
pub fn validate_data(
    rows: &[Row],
    mapping: &FieldMapping,
    options: &ValidationOptions,
) -> ValidationResult {
    let rules = create_validation_rules(options);
    let mut errors: Vec<ValidationIssue> = Vec::new();
    let mut stats = DataQualityStats::default();
    let mut seen_ids: HashSet<String> = HashSet::new();

    let claimant_column = mapping.get(CanonicalField::ClaimantId);
    let date_column = mapping.get(CanonicalField::ClaimDate);

    for (offset, row) in rows.iter().enumerate() {
        if errors.len() >= options.max_errors {
            debug!(
                processed = stats.row_count,
                total = rows.len(),
                max_errors = options.max_errors,
                "issue limit reached, stopping validation"
            );
            break;
        }
        let index = offset + options.row_offset;
        let mut issues = validate_row(row, index, mapping, &rules);

        if let Some(id) = claimant_column.and_then(|column| row.value(column).trimmed()) {
            if seen_ids.contains(&id) {
                stats.duplicate_ids += 1;
                issues.push(ValidationIssue::warning(
                    index,
                    CanonicalField::ClaimantId,
                    id,
                    "Duplicate claimant ID",
                ));
            } else {
                seen_ids.insert(id);
            }
        }

        for field in REQUIRED_FIELDS {
            let missing = mapping
                .get(field)
                .is_none_or(|column| row.value(column).is_blank());
            if missing {
                *stats.missing_required.entry(field).or_insert(0) += 1;
            }
        }

        if let Some(column) = date_column {
            let value = row.value(column);
            if !value.is_blank() && parse_date(value, &options.date_formats).is_none() {
                stats.invalid_dates += 1;
            }
        }

        stats.row_count += 1;
        if issues.iter().any(ValidationIssue::is_error) {
            stats.invalid_rows += 1;
        } else {
            stats.valid_rows += 1;
        }
        errors.extend(issues);
    }

    errors.truncate(options.max_errors);
    stats.finalize();
    ValidationResult { errors, stats }
}
