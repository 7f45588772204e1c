//! Column mapping for uploaded claims and experience files.
//!
//! [`generate_mappings`] suggests a schema field for every source column
//! using Jaro-Winkler similarity and greedy one-to-one assignment. The
//! resulting [`MappingSet`] supports interactive edits (target swaps and
//! clears), required-field validation, and saved user preferences.

pub mod error;
pub mod preferences;
pub mod schema;
pub mod score;
pub mod set;

pub use error::{MappingError, PreferenceError};
pub use preferences::{JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Preferences};
pub use schema::{SchemaField, SchemaType};
pub use score::{MIN_MAPPING_CONFIDENCE, normalize, score_column};
pub use set::{ColumnMapping, MappingSet, MappingValidation, generate_mappings, validate_mappings};
