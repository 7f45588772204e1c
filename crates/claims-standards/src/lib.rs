//! Carrier export format registry.
//!
//! A carrier pattern describes how one insurer or PBM lays out its claims
//! export: header vocabulary, required columns, date/amount spellings, and a
//! default column mapping. The built-in registry is plain data
//! (`data/carriers.toml`) embedded at compile time; user files can append
//! further carriers without code changes.
//!
//! # Example
//!
//! ```rust,ignore
//! use claims_standards::CarrierRegistry;
//!
//! let registry = CarrierRegistry::builtin();
//! let anthem = registry.find("anthem").unwrap();
//! println!("{} requires {:?}", anthem.name, anthem.required_columns);
//! ```

pub mod carrier;
pub mod embedded;
pub mod error;
pub mod registry;

pub use carrier::CarrierPattern;
pub use error::{RegistryError, Result};
pub use registry::CarrierRegistry;
