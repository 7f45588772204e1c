//! CLI library components for the claims ingestion tool.

pub mod logging;
