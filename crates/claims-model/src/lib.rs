//! Shared data model for the claims ingestion pipeline.
//!
//! Every other crate in the workspace speaks these types:
//!
//! - [`Row`] / [`CellValue`]: one raw CSV row keyed by header string
//! - [`CanonicalField`] / [`FieldMapping`]: canonical claim attributes and
//!   the source columns they are read from
//! - [`ClaimRecord`]: the normalized output unit
//! - [`ValidationIssue`], [`DataQualityStats`], [`ValidationResult`]:
//!   the data-quality contract
//! - [`CarrierDetectionResult`]: a ranked carrier recommendation
//!
//! Boundary types serialize with camelCase keys so they can be handed to
//! JSON consumers unchanged.

pub mod cell;
pub mod detection;
pub mod field;
pub mod issue;
pub mod record;
pub mod stats;

pub use cell::{CellValue, Row};
pub use detection::CarrierDetectionResult;
pub use field::{CanonicalField, FieldMapping, UnknownField};
pub use issue::{Severity, ValidationIssue};
pub use record::{ClaimRecord, month_key};
pub use stats::{DataQualityStats, ValidationResult, completeness};
