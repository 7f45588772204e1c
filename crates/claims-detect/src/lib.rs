//! Carrier format detection.
//!
//! Given a file's headers and a few sample rows, [`detect_format`] ranks the
//! carriers of a [`CarrierRegistry`](claims_standards::CarrierRegistry) by
//! header vocabulary, required columns and value shapes, and proposes a
//! column mapping for each candidate. Detection never fails: no match is an
//! empty result.

pub mod detector;
pub mod mapping;
pub mod normalize;
pub mod score;

pub use detector::{DetectionOptions, FILENAME_BOOST, detect_format, detect_format_with_filename};
pub use mapping::suggest_mapping;
pub use normalize::{contains_either, loosely_matches, normalize_key};
pub use score::{CarrierScore, score_carrier};
