//! Row-level validation issues.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::CanonicalField;

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Value is invalid or unusable; the row counts as invalid.
    Error,
    /// Value is suspicious but usable; the row stays valid.
    Warning,
}

impl Severity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single validation finding for one field of one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Row index (0-based, plus any chunk offset supplied by the caller).
    pub row: usize,
    pub field: CanonicalField,
    /// Raw value as rendered text; empty for missing values.
    pub value: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(
        row: usize,
        field: CanonicalField,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row,
            field,
            value: value.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(
        row: usize,
        field: CanonicalField,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row,
            field,
            value: value.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} [{}] {}: {}",
            self.row, self.severity, self.field, self.message
        )
    }
}
