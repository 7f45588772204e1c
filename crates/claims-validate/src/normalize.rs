//! Row normalization into [`ClaimRecord`]s.

use claims_model::{CanonicalField, ClaimRecord, FieldMapping, Row, month_key};
use claims_transform::{DateFormat, parse_amount, parse_date};
use tracing::warn;

use crate::options::NormalizeOptions;

/// Service type used when the mapped value is blank or unmapped.
pub const UNKNOWN_SERVICE_TYPE: &str = "Unknown";

fn mapped_text(row: &Row, mapping: &FieldMapping, field: CanonicalField) -> Option<String> {
    mapping
        .get(field)
        .and_then(|column| row.value(column).trimmed())
}

fn mapped_amount(row: &Row, mapping: &FieldMapping, field: CanonicalField) -> f64 {
    mapping
        .get(field)
        .map_or(0.0, |column| parse_amount(row.value(column)))
}

/// Converts one raw row into a claim record.
///
/// Returns `None` when the claimant id is unmapped or blank, or the claim
/// date is unmapped or unparseable. A positive explicit total wins;
/// otherwise (including an explicit `0`) the total is medical + pharmacy.
pub fn normalize_row(
    row: &Row,
    mapping: &FieldMapping,
    index: usize,
    formats: &[DateFormat],
) -> Option<ClaimRecord> {
    let claimant_id = mapped_text(row, mapping, CanonicalField::ClaimantId)?;
    let claim_date = mapping
        .get(CanonicalField::ClaimDate)
        .and_then(|column| parse_date(row.value(column), formats))?;

    let medical_amount = mapped_amount(row, mapping, CanonicalField::MedicalAmount);
    let pharmacy_amount = mapped_amount(row, mapping, CanonicalField::PharmacyAmount);
    let explicit_total = mapped_amount(row, mapping, CanonicalField::TotalAmount);
    let total_amount = if explicit_total > 0.0 {
        explicit_total
    } else {
        medical_amount + pharmacy_amount
    };

    Some(ClaimRecord {
        id: format!("{claimant_id}-{index}"),
        claimant_id,
        claim_date,
        month_key: month_key(claim_date),
        service_type: mapped_text(row, mapping, CanonicalField::ServiceType)
            .unwrap_or_else(|| UNKNOWN_SERVICE_TYPE.to_string()),
        medical_amount,
        pharmacy_amount,
        total_amount,
        icd_code: mapped_text(row, mapping, CanonicalField::IcdCode),
        medical_desc: mapped_text(row, mapping, CanonicalField::MedicalDesc),
        layman_term: mapped_text(row, mapping, CanonicalField::LaymanTerm),
        provider: mapped_text(row, mapping, CanonicalField::Provider),
        location: mapped_text(row, mapping, CanonicalField::Location),
        original_row: row.clone(),
    })
}

/// Normalizes every row, dropping the ones [`normalize_row`] rejects.
///
/// With `skip_invalid_rows = false` each rejected row is logged as a
/// warning; it is still left out of the output.
pub fn normalize_data(
    rows: &[Row],
    mapping: &FieldMapping,
    options: &NormalizeOptions,
) -> Vec<ClaimRecord> {
    rows.iter()
        .enumerate()
        .filter_map(|(offset, row)| {
            let index = offset + options.row_offset;
            let record = normalize_row(row, mapping, index, &options.date_formats);
            if record.is_none() && !options.skip_invalid_rows {
                warn!(row = index, "row dropped: missing claimant id or unparseable claim date");
            }
            record
        })
        .collect()
}
