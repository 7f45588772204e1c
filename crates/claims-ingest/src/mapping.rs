//! Choosing the field mapping a file is processed with.

use std::path::Path;

use claims_map::{SchemaType, generate_mappings};
use claims_model::{CarrierDetectionResult, FieldMapping};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Where the mapping in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MappingSource {
    /// Supplied by the caller.
    Supplied,
    /// A detected carrier's suggested mapping.
    Detected,
    /// Fuzzy column matching against the claims schema.
    Inferred,
}

/// The mapping for one file plus the carrier evidence behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMapping {
    pub mapping: FieldMapping,
    pub source: MappingSource,
    pub carrier: Option<String>,
    pub confidence: Option<u8>,
}

/// Picks the mapping for a file.
///
/// In order: the supplied mapping (which must be complete), the first
/// detected carrier whose suggestion is complete, then fuzzy matching of
/// the headers against the claims schema. Carrier and confidence always
/// reflect the best detection, or the detection whose mapping was used.
///
/// Fails with [`IngestError::IncompleteMapping`] when a mapping exists but
/// lacks required fields, and [`IngestError::MappingRequired`] when nothing
/// was detected and fuzzy matching found no usable mapping either.
pub fn resolve_mapping(
    path: &Path,
    supplied: Option<FieldMapping>,
    detections: &[CarrierDetectionResult],
    headers: &[String],
) -> Result<ResolvedMapping> {
    let top = detections.first();
    let carrier = top.map(|d| d.carrier.clone());
    let confidence = top.map(|d| d.confidence);

    if let Some(mapping) = supplied {
        let missing = mapping.missing_required();
        if !missing.is_empty() {
            return Err(IngestError::IncompleteMapping {
                path: path.to_path_buf(),
                missing,
            });
        }
        return Ok(ResolvedMapping {
            mapping,
            source: MappingSource::Supplied,
            carrier,
            confidence,
        });
    }

    if let Some(detection) = detections
        .iter()
        .find(|d| d.suggested_mapping.is_complete())
    {
        return Ok(ResolvedMapping {
            mapping: detection.suggested_mapping.clone(),
            source: MappingSource::Detected,
            carrier: Some(detection.carrier.clone()),
            confidence: Some(detection.confidence),
        });
    }

    let inferred = generate_mappings(headers, SchemaType::Claims)
        .to_field_mapping()
        .unwrap_or_default();
    if inferred.is_complete() {
        debug!(fields = inferred.len(), "using fuzzy column mapping");
        return Ok(ResolvedMapping {
            mapping: inferred,
            source: MappingSource::Inferred,
            carrier,
            confidence,
        });
    }

    match top {
        Some(detection) => Err(IngestError::IncompleteMapping {
            path: path.to_path_buf(),
            missing: detection.suggested_mapping.missing_required(),
        }),
        None => Err(IngestError::MappingRequired {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_model::CanonicalField;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn detection(carrier: &str, mapping: FieldMapping) -> CarrierDetectionResult {
        CarrierDetectionResult {
            carrier: carrier.to_string(),
            confidence: 100,
            indicators: Vec::new(),
            suggested_mapping: mapping,
            date_format: None,
            amount_format: None,
        }
    }

    fn complete() -> FieldMapping {
        FieldMapping::new()
            .with(CanonicalField::ClaimantId, "id")
            .with(CanonicalField::ClaimDate, "dt")
            .with(CanonicalField::ServiceType, "type")
    }

    #[test]
    fn test_supplied_wins() {
        let resolved = resolve_mapping(
            Path::new("f.csv"),
            Some(complete()),
            &[detection("Anthem", FieldMapping::new())],
            &cols(&["id", "dt", "type"]),
        )
        .unwrap();
        assert_eq!(resolved.source, MappingSource::Supplied);
        assert_eq!(resolved.carrier.as_deref(), Some("Anthem"));
    }

    #[test]
    fn test_incomplete_supplied_mapping() {
        let partial = FieldMapping::new().with(CanonicalField::ClaimantId, "id");
        let err = resolve_mapping(Path::new("f.csv"), Some(partial), &[], &[]).unwrap_err();
        match err {
            IngestError::IncompleteMapping { missing, .. } => assert_eq!(
                missing,
                vec![CanonicalField::ClaimDate, CanonicalField::ServiceType]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_first_complete_detection_is_used() {
        let detections = [
            detection("Anthem", FieldMapping::new().with(CanonicalField::ClaimantId, "id")),
            detection("Cigna", complete()),
        ];
        let resolved = resolve_mapping(Path::new("f.csv"), None, &detections, &[]).unwrap();
        assert_eq!(resolved.source, MappingSource::Detected);
        assert_eq!(resolved.carrier.as_deref(), Some("Cigna"));
    }

    #[test]
    fn test_fuzzy_fallback() {
        let resolved = resolve_mapping(
            Path::new("f.csv"),
            None,
            &[],
            &cols(&["claimant_id", "claim_date", "service_type"]),
        )
        .unwrap();
        assert_eq!(resolved.source, MappingSource::Inferred);
        assert_eq!(resolved.mapping.get(CanonicalField::ClaimDate), Some("claim_date"));
        assert_eq!(resolved.carrier, None);
    }

    #[test]
    fn test_nothing_usable() {
        let headers = cols(&["alpha", "beta"]);
        let err = resolve_mapping(Path::new("f.csv"), None, &[], &headers).unwrap_err();
        assert!(matches!(err, IngestError::MappingRequired { .. }));

        let detections = [detection("Anthem", FieldMapping::new())];
        let err = resolve_mapping(Path::new("f.csv"), None, &detections, &headers).unwrap_err();
        assert!(matches!(err, IngestError::IncompleteMapping { .. }));
    }
}
