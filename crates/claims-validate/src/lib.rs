//! Row validation and normalization for mapped claims data.
//!
//! - [`validate_data`]: per-row issues plus [`DataQualityStats`](claims_model::DataQualityStats)
//! - [`normalize_data`]: raw rows to [`ClaimRecord`](claims_model::ClaimRecord)s
//!
//! Data problems never surface as `Err`: they are issues in the result, or
//! rows left out of the normalized output. Both passes are pure and may be
//! run on chunks; duplicate tracking and statistics are then chunk-local.

pub mod normalize;
pub mod options;
pub mod rules;
pub mod validate;

pub use normalize::{UNKNOWN_SERVICE_TYPE, normalize_data, normalize_row};
pub use options::{DEFAULT_MAX_ERRORS, NormalizeOptions, ValidationOptions};
pub use rules::{RuleKind, ValidationRule, create_validation_rules, is_valid_icd};
pub use validate::{REQUIRED_FIELDS, validate_data, validate_row};
