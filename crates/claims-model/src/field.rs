//! Canonical claim fields and the mapping from fields to source columns.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A canonical claim attribute. The set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CanonicalField {
    ClaimantId,
    ClaimDate,
    ServiceType,
    MedicalAmount,
    PharmacyAmount,
    TotalAmount,
    IcdCode,
    MedicalDesc,
    LaymanTerm,
    Provider,
    Location,
}

impl CanonicalField {
    /// All fields in canonical order.
    pub const ALL: [CanonicalField; 11] = [
        Self::ClaimantId,
        Self::ClaimDate,
        Self::ServiceType,
        Self::MedicalAmount,
        Self::PharmacyAmount,
        Self::TotalAmount,
        Self::IcdCode,
        Self::MedicalDesc,
        Self::LaymanTerm,
        Self::Provider,
        Self::Location,
    ];

    /// Fields a mapping must carry before rows can be normalized.
    pub const MAPPING_REQUIRED: [CanonicalField; 3] =
        [Self::ClaimantId, Self::ClaimDate, Self::ServiceType];

    /// camelCase name used at the JSON boundary.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ClaimantId => "claimantId",
            Self::ClaimDate => "claimDate",
            Self::ServiceType => "serviceType",
            Self::MedicalAmount => "medicalAmount",
            Self::PharmacyAmount => "pharmacyAmount",
            Self::TotalAmount => "totalAmount",
            Self::IcdCode => "icdCode",
            Self::MedicalDesc => "medicalDesc",
            Self::LaymanTerm => "laymanTerm",
            Self::Provider => "provider",
            Self::Location => "location",
        }
    }

    /// Human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ClaimantId => "Claimant ID",
            Self::ClaimDate => "Claim Date",
            Self::ServiceType => "Service Type",
            Self::MedicalAmount => "Medical Amount",
            Self::PharmacyAmount => "Pharmacy Amount",
            Self::TotalAmount => "Total Amount",
            Self::IcdCode => "ICD Code",
            Self::MedicalDesc => "Medical Description",
            Self::LaymanTerm => "Layman Term",
            Self::Provider => "Provider",
            Self::Location => "Location",
        }
    }

    pub fn is_mapping_required(&self) -> bool {
        Self::MAPPING_REQUIRED.contains(self)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a canonical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown canonical field: {}", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for CanonicalField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownField(trimmed.to_string()))
    }
}

impl TryFrom<String> for CanonicalField {
    type Error = UnknownField;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CanonicalField> for String {
    fn from(field: CanonicalField) -> Self {
        field.as_str().to_string()
    }
}

/// Partial mapping from canonical fields to source column names.
///
/// Serialized as a flat object keyed by camelCase field names; unmapped
/// fields are simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(BTreeMap<CanonicalField, String>);

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, field: CanonicalField, column: impl Into<String>) -> Self {
        self.set(field, column);
        self
    }

    /// Maps `field` to `column`. Blank column names unmap the field.
    pub fn set(&mut self, field: CanonicalField, column: impl Into<String>) {
        let column = column.into();
        if column.trim().is_empty() {
            self.0.remove(&field);
        } else {
            self.0.insert(field, column);
        }
    }

    pub fn remove(&mut self, field: CanonicalField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.0.contains_key(&field)
    }

    /// Mapping-required fields that are not mapped, in canonical order.
    pub fn missing_required(&self) -> Vec<CanonicalField> {
        CanonicalField::MAPPING_REQUIRED
            .iter()
            .copied()
            .filter(|field| !self.contains(*field))
            .collect()
    }

    /// True when claimantId, claimDate and serviceType are all mapped.
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.0.iter().map(|(field, column)| (*field, column.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CanonicalField, String)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (CanonicalField, String)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (field, column) in iter {
            mapping.set(field, column);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_names_case_insensitively() {
        assert_eq!("claimantId".parse(), Ok(CanonicalField::ClaimantId));
        assert_eq!("ICDCODE".parse(), Ok(CanonicalField::IcdCode));
        assert!("memberId".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn completeness_requires_core_three() {
        let mapping = FieldMapping::new()
            .with(CanonicalField::ClaimantId, "id")
            .with(CanonicalField::ClaimDate, "dt");
        assert!(!mapping.is_complete());
        assert_eq!(mapping.missing_required(), vec![CanonicalField::ServiceType]);

        let mapping = mapping.with(CanonicalField::ServiceType, "type");
        assert!(mapping.is_complete());
    }

    #[test]
    fn blank_column_unmaps() {
        let mut mapping = FieldMapping::new().with(CanonicalField::Provider, "prov");
        mapping.set(CanonicalField::Provider, "  ");
        assert!(mapping.is_empty());
    }

    #[test]
    fn json_shape_is_flat_camel_case() {
        let mapping = FieldMapping::new()
            .with(CanonicalField::ClaimantId, "member_id")
            .with(CanonicalField::TotalAmount, "paid");
        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"claimantId":"member_id","totalAmount":"paid"}"#);

        let back: FieldMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mapping);
    }
}
