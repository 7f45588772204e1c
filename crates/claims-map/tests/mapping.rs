//! Mapping generation, edits and preference persistence.

use claims_map::{
    JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore, SchemaType, generate_mappings,
    validate_mappings,
};
use claims_model::CanonicalField;

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn carrier_style_headers_map_to_claims_fields() {
    let set = generate_mappings(
        &cols(&[
            "Member ID",
            "Service Date",
            "Claim Type",
            "Medical Paid",
            "Rx Paid",
            "Total Paid",
            "Diagnosis Code",
            "Provider Name",
        ]),
        SchemaType::Claims,
    );

    assert_eq!(set.target_of("Member ID"), Some("claimantId"));
    assert_eq!(set.target_of("Service Date"), Some("claimDate"));
    assert_eq!(set.target_of("Claim Type"), Some("serviceType"));
    assert_eq!(set.target_of("Medical Paid"), Some("medicalAmount"));
    assert_eq!(set.target_of("Rx Paid"), Some("pharmacyAmount"));
    assert_eq!(set.target_of("Total Paid"), Some("totalAmount"));
    assert_eq!(set.target_of("Diagnosis Code"), Some("icdCode"));
    assert_eq!(set.target_of("Provider Name"), Some("provider"));
    assert!(set.validate().is_valid);
    assert!(set.mappings.iter().all(|m| !m.is_perfect_match));
}

#[test]
fn targets_are_never_duplicated() {
    let set = generate_mappings(
        &cols(&["claim_date", "service_date", "date_of_service", "dos"]),
        SchemaType::Claims,
    );
    let date_holders = set
        .mappings
        .iter()
        .filter(|m| m.target_column.as_deref() == Some("claimDate"))
        .count();
    assert_eq!(date_holders, 1);
    assert_eq!(set.source_for("claimDate"), Some("claim_date"));
}

#[test]
fn missing_required_fields_are_reported() {
    let set = generate_mappings(&cols(&["claimant_id", "notes"]), SchemaType::Claims);
    let validation = validate_mappings(&set.mappings, SchemaType::Claims);
    assert!(!validation.is_valid);
    assert_eq!(
        validation.missing_required,
        vec!["claimDate".to_string(), "serviceType".to_string()]
    );
}

#[test]
fn experience_schema_maps_monthly_columns() {
    let set = generate_mappings(
        &cols(&["Month", "Medical Claims", "Pharmacy Claims", "Premium", "Enrollment"]),
        SchemaType::Experience,
    );
    assert!(set.validate().is_valid);
    assert_eq!(set.target_of("Premium"), Some("premium"));
    assert!(set.mappings[0].is_perfect_match);
}

#[test]
fn mapping_set_serializes_camel_case() {
    let set = generate_mappings(&cols(&["claimant_id", "mystery"]), SchemaType::Claims);
    let json = serde_json::to_value(&set).unwrap();
    assert_eq!(json["schema"], "claims");
    assert_eq!(json["mappings"][0]["sourceColumn"], "claimant_id");
    assert_eq!(json["mappings"][0]["targetColumn"], "claimantId");
    assert_eq!(json["mappings"][0]["isPerfectMatch"], true);
    assert!(json["mappings"][1].get("targetColumn").is_none());
}

#[test]
fn preferences_round_trip_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs").join("mapping.json");
    let headers = cols(&["Member #", "Svc Dt", "Kind"]);

    let mut first = generate_mappings(&headers, SchemaType::Claims);
    first.assign("Member #", "claimantId").unwrap();
    first.assign("Svc Dt", "claimDate").unwrap();
    first.assign("Kind", "serviceType").unwrap();

    let mut store = JsonFilePreferenceStore::new(&path);
    store.save(SchemaType::Claims, &first.preferences()).unwrap();
    assert!(path.exists());

    let reopened = JsonFilePreferenceStore::new(&path);
    let saved = reopened.load(SchemaType::Claims).unwrap();
    assert!(reopened.load(SchemaType::Experience).unwrap().is_empty());

    let mut next = generate_mappings(&cols(&["Kind", "Member #", "Svc Dt", "Extra"]), SchemaType::Claims);
    let applied = next.apply_preferences(&saved);
    assert_eq!(applied, 3);

    let mapping = next.to_field_mapping().unwrap();
    assert_eq!(mapping.get(CanonicalField::ClaimantId), Some("Member #"));
    assert_eq!(mapping.get(CanonicalField::ClaimDate), Some("Svc Dt"));
    assert_eq!(mapping.get(CanonicalField::ServiceType), Some("Kind"));
    assert!(mapping.is_complete());
}

#[test]
fn preferences_skip_absent_columns() {
    let mut store = MemoryPreferenceStore::default();
    let mut prefs = claims_map::Preferences::new();
    prefs.insert("Old Column".to_string(), "claimantId".to_string());
    prefs.insert("dt".to_string(), "claimDate".to_string());
    store.save(SchemaType::Claims, &prefs).unwrap();

    let mut set = generate_mappings(&cols(&["dt"]), SchemaType::Claims);
    let applied = set.apply_preferences(&store.load(SchemaType::Claims).unwrap());
    assert_eq!(applied, 1);
    assert_eq!(set.target_of("dt"), Some("claimDate"));
}
