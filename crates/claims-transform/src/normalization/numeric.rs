//! Amount parsing for currency-like claim values.
//!
//! Claims exports mix plain numbers (`1234.5`), currency (`$1,234.50`) and
//! accounting negatives (`(1,234.50)`). Parsing strips the decoration and
//! always returns the magnitude: sign information is discarded here, and
//! [`amount_is_negative`] reports it separately for validation.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use claims_model::CellValue;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Removes `$`, thousands separators, whitespace and parentheses.
fn strip_decoration(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '(' | ')') && !c.is_whitespace())
        .collect()
}

/// Parses a currency-like string into a non-negative amount.
///
/// Returns `0.0` for empty, unparseable or non-finite input.
pub fn parse_amount_str(value: &str) -> f64 {
    let cleaned = strip_decoration(value);
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount.abs(),
        _ => 0.0,
    }
}

/// Parses a raw cell into a non-negative amount.
pub fn parse_amount(value: &CellValue) -> f64 {
    match value {
        CellValue::Null => 0.0,
        CellValue::Number(n) if n.is_finite() => n.abs(),
        CellValue::Number(_) => 0.0,
        CellValue::Text(s) => parse_amount_str(s),
    }
}

/// True when the raw value carries a negative sign (`-150`, `$-150`, `(150.00)`).
pub fn amount_is_negative(value: &CellValue) -> bool {
    match value {
        CellValue::Null => false,
        CellValue::Number(n) => *n < 0.0,
        CellValue::Text(s) => {
            let compact: String = s.chars().filter(|c| !c.is_whitespace() && *c != '$').collect();
            compact.starts_with('-') || (compact.starts_with('(') && compact.ends_with(')'))
        }
    }
}

/// True when the value is blank or parses as a number after stripping decoration.
pub fn is_amount(value: &CellValue) -> bool {
    match value {
        CellValue::Null => true,
        CellValue::Number(n) => n.is_finite(),
        CellValue::Text(s) => {
            let cleaned = strip_decoration(s);
            cleaned.is_empty() || cleaned.parse::<f64>().is_ok_and(f64::is_finite)
        }
    }
}

/// A recognizable amount spelling, used as a carrier format hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AmountFormat {
    /// `1234.5`, `-12`
    Plain,
    /// `1,234.56` (exactly two decimals)
    Decimal,
    /// `$1,234.56`
    Currency,
    /// `(1,234.56)`
    Accounting,
}

impl AmountFormat {
    pub const ALL: [AmountFormat; 4] = [
        Self::Plain,
        Self::Decimal,
        Self::Currency,
        Self::Accounting,
    ];

    pub const fn token(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Decimal => "decimal",
            Self::Currency => "currency",
            Self::Accounting => "accounting",
        }
    }

    const fn pattern(&self) -> &'static str {
        match self {
            Self::Plain => r"^-?\d+(\.\d+)?$",
            Self::Decimal => r"^-?\d{1,3}(,?\d{3})*\.\d{2}$",
            Self::Currency => r"^-?\$\s?-?\d{1,3}(,?\d{3})*(\.\d{1,2})?$",
            Self::Accounting => r"^\(\$?\d{1,3}(,?\d{3})*(\.\d{1,2})?\)$",
        }
    }

    pub fn regex(&self) -> &'static Regex {
        static COMPILED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
            AmountFormat::ALL
                .iter()
                .map(|format| Regex::new(format.pattern()).expect("Invalid amount shape regex"))
                .collect()
        });
        &COMPILED[*self as usize]
    }

    pub fn matches_shape(&self, value: &str) -> bool {
        self.regex().is_match(value.trim())
    }
}

impl fmt::Display for AmountFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error returned for an unrecognized amount format token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAmountFormat(pub String);

impl fmt::Display for UnknownAmountFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown amount format: {}", self.0)
    }
}

impl std::error::Error for UnknownAmountFormat {}

impl FromStr for AmountFormat {
    type Err = UnknownAmountFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.token().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownAmountFormat(trimmed.to_string()))
    }
}

impl TryFrom<String> for AmountFormat {
    type Error = UnknownAmountFormat;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AmountFormat> for String {
    fn from(format: AmountFormat) -> Self {
        format.token().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_decoration() {
        assert_eq!(parse_amount_str("$1,234.56"), 1234.56);
        assert_eq!(parse_amount_str("  500 "), 500.0);
        assert_eq!(parse_amount_str("(250.00)"), 250.0);
    }

    #[test]
    fn test_sign_is_discarded() {
        assert_eq!(parse_amount_str("-$150.00"), 150.0);
        assert_eq!(parse_amount_str("$150.00"), 150.0);
        assert_eq!(parse_amount(&CellValue::Number(-42.0)), 42.0);
    }

    #[test]
    fn test_invalid_is_zero() {
        assert_eq!(parse_amount_str(""), 0.0);
        assert_eq!(parse_amount_str("N/A"), 0.0);
        assert_eq!(parse_amount_str("inf"), 0.0);
        assert_eq!(parse_amount(&CellValue::Null), 0.0);
    }

    #[test]
    fn test_negative_detection() {
        assert!(amount_is_negative(&CellValue::from("-150")));
        assert!(amount_is_negative(&CellValue::from("$-150")));
        assert!(amount_is_negative(&CellValue::from(" (150.00) ")));
        assert!(!amount_is_negative(&CellValue::from("150")));
        assert!(!amount_is_negative(&CellValue::Null));
    }

    #[test]
    fn test_is_amount() {
        assert!(is_amount(&CellValue::from("$1,000")));
        assert!(is_amount(&CellValue::from("")));
        assert!(!is_amount(&CellValue::from("ten dollars")));
    }

    #[test]
    fn test_amount_shapes() {
        assert!(AmountFormat::Currency.matches_shape("$500.00"));
        assert!(AmountFormat::Currency.matches_shape("$1,500"));
        assert!(!AmountFormat::Currency.matches_shape("500.00"));
        assert!(AmountFormat::Decimal.matches_shape("1,500.00"));
        assert!(AmountFormat::Plain.matches_shape("500"));
        assert!(AmountFormat::Accounting.matches_shape("(1,500.00)"));
        assert!(!AmountFormat::Plain.matches_shape("01/15/2024"));
    }
}
