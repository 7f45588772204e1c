//! Column mapping sets: generation, validation and interactive edits.

use std::collections::BTreeMap;

use claims_model::FieldMapping;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MappingError;
use crate::schema::{SchemaType, canonical_field};
use crate::score::{MIN_MAPPING_CONFIDENCE, assign_greedy, is_perfect_match, score_column};

/// Mapping of one source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub source_column: String,
    /// Schema field name, or `None` when the column is left unmapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_column: Option<String>,
    /// 0.0 to 1.0; user-made assignments are 1.0.
    pub confidence: f64,
    pub is_perfect_match: bool,
}

impl ColumnMapping {
    fn unmapped(source: &str) -> Self {
        Self {
            source_column: source.to_string(),
            target_column: None,
            confidence: 0.0,
            is_perfect_match: false,
        }
    }
}

/// Outcome of [`validate_mappings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingValidation {
    pub is_valid: bool,
    /// Required schema fields no column maps to.
    pub missing_required: Vec<String>,
}

/// All column mappings of one source file against one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSet {
    pub schema: SchemaType,
    /// One entry per source column, in source order.
    pub mappings: Vec<ColumnMapping>,
}

/// Suggests a target for every source column.
///
/// Pairs are scored with Jaro-Winkler similarity (plus synonym matches) and
/// assigned greedily by descending score, one target per column and one
/// column per target. Columns without a pair above the threshold stay
/// unmapped.
pub fn generate_mappings(source_columns: &[String], schema: SchemaType) -> MappingSet {
    let fields = schema.fields();
    let mut mappings: Vec<ColumnMapping> = source_columns
        .iter()
        .map(|source| ColumnMapping::unmapped(source))
        .collect();

    for candidate in assign_greedy(source_columns, fields, MIN_MAPPING_CONFIDENCE) {
        let field = &fields[candidate.field_index];
        let mapping = &mut mappings[candidate.source_index];
        mapping.target_column = Some(field.name.to_string());
        mapping.confidence = candidate.score;
        mapping.is_perfect_match = is_perfect_match(&mapping.source_column, field);
    }

    debug!(
        schema = %schema,
        columns = source_columns.len(),
        mapped = mappings.iter().filter(|m| m.target_column.is_some()).count(),
        "generated column mappings"
    );

    MappingSet { schema, mappings }
}

/// Checks that every required schema field has a source column.
pub fn validate_mappings(mappings: &[ColumnMapping], schema: SchemaType) -> MappingValidation {
    let missing_required: Vec<String> = schema
        .required_fields()
        .filter(|field| {
            !mappings.iter().any(|m| {
                m.target_column
                    .as_deref()
                    .is_some_and(|target| target.eq_ignore_ascii_case(field.name))
            })
        })
        .map(|field| field.name.to_string())
        .collect();

    MappingValidation {
        is_valid: missing_required.is_empty(),
        missing_required,
    }
}

impl MappingSet {
    pub fn validate(&self) -> MappingValidation {
        validate_mappings(&self.mappings, self.schema)
    }

    pub fn target_of(&self, source: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.source_column == source)
            .and_then(|m| m.target_column.as_deref())
    }

    pub fn source_for(&self, target: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| {
                m.target_column
                    .as_deref()
                    .is_some_and(|t| t.eq_ignore_ascii_case(target))
            })
            .map(|m| m.source_column.as_str())
    }

    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.mappings
            .iter()
            .filter(|m| m.target_column.is_none())
            .map(|m| m.source_column.as_str())
            .collect()
    }

    /// Points `source` at `target`.
    ///
    /// If another column already holds `target`, the two columns swap
    /// targets, so a target is never held twice.
    pub fn assign(&mut self, source: &str, target: &str) -> Result<(), MappingError> {
        let field = self
            .schema
            .field(target)
            .ok_or_else(|| MappingError::FieldNotFound {
                schema: self.schema.to_string(),
                field: target.to_string(),
            })?;
        let index = self.index_of(source)?;

        let previous = self.mappings[index].target_column.take();
        if let Some(holder) = self.mappings.iter().position(|m| {
            m.target_column
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(field.name))
        }) {
            debug!(from = %self.mappings[holder].source_column, to = source, target = field.name, "swapping mapping target");
            self.retarget(holder, previous);
        }

        let mapping = &mut self.mappings[index];
        mapping.target_column = Some(field.name.to_string());
        mapping.confidence = 1.0;
        mapping.is_perfect_match = is_perfect_match(&mapping.source_column, field);
        Ok(())
    }

    /// Leaves `source` unmapped.
    pub fn clear(&mut self, source: &str) -> Result<(), MappingError> {
        let index = self.index_of(source)?;
        self.retarget(index, None);
        Ok(())
    }

    /// Claims-schema mappings as a canonical [`FieldMapping`].
    ///
    /// Returns `None` for other schemas.
    pub fn to_field_mapping(&self) -> Option<FieldMapping> {
        if self.schema != SchemaType::Claims {
            return None;
        }
        Some(
            self.mappings
                .iter()
                .filter_map(|m| {
                    let field = canonical_field(m.target_column.as_deref()?)?;
                    Some((field, m.source_column.clone()))
                })
                .collect(),
        )
    }

    /// Current assignments as `source -> target`, suitable for saving.
    pub fn preferences(&self) -> BTreeMap<String, String> {
        self.mappings
            .iter()
            .filter_map(|m| {
                m.target_column
                    .as_ref()
                    .map(|target| (m.source_column.clone(), target.clone()))
            })
            .collect()
    }

    /// Re-applies saved `source -> target` assignments.
    ///
    /// Entries whose source column is absent from this file, or whose target
    /// is not a schema field, are skipped. Returns the number applied.
    pub fn apply_preferences(&mut self, preferences: &BTreeMap<String, String>) -> usize {
        let mut applied = 0;
        for (source, target) in preferences {
            if self.assign(source, target).is_ok() {
                applied += 1;
            }
        }
        debug!(schema = %self.schema, applied, "applied saved mapping preferences");
        applied
    }

    fn index_of(&self, source: &str) -> Result<usize, MappingError> {
        self.mappings
            .iter()
            .position(|m| m.source_column == source)
            .ok_or_else(|| MappingError::ColumnNotFound(source.to_string()))
    }

    fn retarget(&mut self, index: usize, target: Option<String>) {
        let schema = self.schema;
        let mapping = &mut self.mappings[index];
        match target.as_deref().and_then(|name| schema.field(name)) {
            Some(field) => {
                mapping.confidence = score_column(&mapping.source_column, field);
                mapping.is_perfect_match = is_perfect_match(&mapping.source_column, field);
                mapping.target_column = Some(field.name.to_string());
            }
            None => {
                mapping.target_column = None;
                mapping.confidence = 0.0;
                mapping.is_perfect_match = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_model::CanonicalField;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_every_source_gets_an_entry() {
        let set = generate_mappings(&cols(&["claimant_id", "mystery", "claim_date"]), SchemaType::Claims);
        assert_eq!(set.mappings.len(), 3);
        assert_eq!(set.target_of("claimant_id"), Some("claimantId"));
        assert_eq!(set.target_of("mystery"), None);
        assert!(set.mappings[0].is_perfect_match);
        assert_eq!(set.unmapped_columns(), vec!["mystery"]);
    }

    #[test]
    fn test_assign_swaps_held_target() {
        let mut set = generate_mappings(&cols(&["claimant_id", "claim_date"]), SchemaType::Claims);
        set.assign("claim_date", "claimantId").unwrap();

        assert_eq!(set.target_of("claim_date"), Some("claimantId"));
        assert_eq!(set.target_of("claimant_id"), Some("claimDate"));
        assert_eq!(set.mappings[1].confidence, 1.0);
    }

    #[test]
    fn test_assign_to_unmapped_moves_target() {
        let mut set = generate_mappings(&cols(&["claimant_id", "mystery"]), SchemaType::Claims);
        set.assign("mystery", "claimantId").unwrap();
        assert_eq!(set.target_of("mystery"), Some("claimantId"));
        assert_eq!(set.target_of("claimant_id"), None);
    }

    #[test]
    fn test_assign_rejects_unknown_names() {
        let mut set = generate_mappings(&cols(&["claimant_id"]), SchemaType::Claims);
        assert!(matches!(
            set.assign("claimant_id", "premium"),
            Err(MappingError::FieldNotFound { .. })
        ));
        assert_eq!(
            set.assign("nope", "claimDate"),
            Err(MappingError::ColumnNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_clear_and_validate() {
        let mut set = generate_mappings(
            &cols(&["claimant_id", "claim_date", "service_type"]),
            SchemaType::Claims,
        );
        assert!(set.validate().is_valid);

        set.clear("claim_date").unwrap();
        let validation = set.validate();
        assert!(!validation.is_valid);
        assert_eq!(validation.missing_required, vec!["claimDate".to_string()]);
    }

    #[test]
    fn test_to_field_mapping() {
        let set = generate_mappings(&cols(&["claimant_id", "claim_date"]), SchemaType::Claims);
        let mapping = set.to_field_mapping().unwrap();
        assert_eq!(mapping.get(CanonicalField::ClaimantId), Some("claimant_id"));
        assert_eq!(mapping.get(CanonicalField::ClaimDate), Some("claim_date"));

        let experience = generate_mappings(&cols(&["month"]), SchemaType::Experience);
        assert!(experience.to_field_mapping().is_none());
    }
}
