//! Value normalization.

pub mod datetime;
pub mod numeric;
