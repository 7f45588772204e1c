//! Tests for claims-model types.

use chrono::NaiveDate;
use claims_model::{
    CanonicalField, CarrierDetectionResult, ClaimRecord, DataQualityStats, FieldMapping, Row,
    Severity, ValidationIssue, ValidationResult, completeness, month_key,
};

fn issue(row: usize, severity: Severity) -> ValidationIssue {
    ValidationIssue {
        row,
        field: CanonicalField::ClaimDate,
        value: "13/40/2024".to_string(),
        message: "Invalid date".to_string(),
        severity,
    }
}

#[test]
fn completeness_rounds_to_two_decimals() {
    assert_eq!(completeness(2, 3), 66.67);
    assert_eq!(completeness(1, 8), 12.5);
    assert_eq!(completeness(0, 0), 0.0);
}

#[test]
fn stats_merge_sums_and_recomputes() {
    let mut left = DataQualityStats {
        row_count: 4,
        valid_rows: 3,
        invalid_rows: 1,
        ..DataQualityStats::default()
    };
    left.missing_required.insert(CanonicalField::ClaimDate, 1);
    left.finalize();

    let mut right = DataQualityStats {
        row_count: 4,
        valid_rows: 1,
        invalid_rows: 3,
        duplicate_ids: 2,
        ..DataQualityStats::default()
    };
    right.missing_required.insert(CanonicalField::ClaimDate, 2);
    right.missing_required.insert(CanonicalField::ServiceType, 1);

    left.merge(&right);
    assert_eq!(left.row_count, 8);
    assert_eq!(left.valid_rows, 4);
    assert_eq!(left.invalid_rows, 4);
    assert_eq!(left.duplicate_ids, 2);
    assert_eq!(left.missing_count(CanonicalField::ClaimDate), 3);
    assert_eq!(left.missing_count(CanonicalField::ServiceType), 1);
    assert_eq!(left.data_completeness, 50.0);
}

#[test]
fn result_merge_caps_issue_list() {
    let mut total = ValidationResult {
        errors: vec![issue(0, Severity::Error), issue(1, Severity::Warning)],
        stats: DataQualityStats::default(),
    };
    let chunk = ValidationResult {
        errors: vec![issue(5, Severity::Error), issue(6, Severity::Error)],
        stats: DataQualityStats::default(),
    };
    total.merge(chunk, 3);
    assert_eq!(total.errors.len(), 3);
    assert_eq!(total.errors[2].row, 5);
    assert_eq!(total.error_count(), 2);
    assert_eq!(total.warning_count(), 1);
    assert!(total.has_errors());
}

#[test]
fn stats_json_shape() {
    let mut stats = DataQualityStats {
        row_count: 3,
        valid_rows: 2,
        invalid_rows: 1,
        invalid_dates: 1,
        duplicate_ids: 0,
        ..DataQualityStats::default()
    };
    stats.missing_required.insert(CanonicalField::ClaimDate, 1);
    stats.finalize();

    insta::assert_json_snapshot!(stats, @r###"
    {
      "rowCount": 3,
      "validRows": 2,
      "invalidRows": 1,
      "missingRequired": {
        "claimDate": 1
      },
      "invalidDates": 1,
      "duplicateIds": 0,
      "dataCompleteness": 66.67
    }
    "###);
}

#[test]
fn issue_serializes_lowercase_severity() {
    let json = serde_json::to_value(issue(3, Severity::Warning)).unwrap();
    assert_eq!(json["severity"], "warning");
    assert_eq!(json["field"], "claimDate");
    assert_eq!(json["row"], 3);
}

#[test]
fn claim_record_json_shape() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let mut original = Row::new();
    original.insert("member_id", "123");
    let record = ClaimRecord {
        id: "123-0".to_string(),
        claimant_id: "123".to_string(),
        claim_date: date,
        month_key: month_key(date),
        service_type: "Office Visit".to_string(),
        medical_amount: 100.0,
        pharmacy_amount: 50.0,
        total_amount: 150.0,
        icd_code: None,
        medical_desc: None,
        layman_term: None,
        provider: Some("Dr. Smith".to_string()),
        location: None,
        original_row: original,
    };

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["claimDate"], "2024-01-15");
    assert_eq!(json["monthKey"], "2024-01");
    assert_eq!(json["totalAmount"], 150.0);
    assert_eq!(json["provider"], "Dr. Smith");
    assert!(json.get("icdCode").is_none());
    assert_eq!(json["originalRow"]["member_id"], "123");

    let back: ClaimRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn detection_result_omits_absent_hints() {
    let result = CarrierDetectionResult {
        carrier: "Anthem".to_string(),
        confidence: 100,
        indicators: vec!["Alias match: anthem".to_string()],
        suggested_mapping: FieldMapping::new().with(CanonicalField::ClaimantId, "member_id"),
        date_format: Some("MM/DD/YYYY".to_string()),
        amount_format: None,
    };
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["suggestedMapping"]["claimantId"], "member_id");
    assert_eq!(json["dateFormat"], "MM/DD/YYYY");
    assert!(json.get("amountFormat").is_none());
}
