//! Embedded carrier data.
//!
//! The seed registry is compiled in with `include_str!()` so detection works
//! without any files on disk.

/// Built-in carriers: Anthem, ESI, UnitedHealthcare, Aetna, Cigna.
pub const CARRIERS_TOML: &str = include_str!("../data/carriers.toml");
