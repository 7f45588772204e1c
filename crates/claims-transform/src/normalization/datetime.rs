//! Date parsing for carrier exports.
//!
//! Carrier files carry dates in many shapes (`01/15/2024`, `2024-01-15`,
//! `20240115`, `1/5/24`, ...). Parsing walks an ordered list of strict
//! formats: a value must match a format's exact shape and form a real
//! calendar date. The first format that succeeds wins, so ambiguous inputs
//! such as `02/03/2024` resolve according to list order. Only when every
//! strict format fails is a lenient catch-all attempted.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use claims_model::CellValue;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A strict date shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateFormat {
    /// `MM/DD/YYYY`
    MonthDayYear,
    /// `YYYY-MM-DD`
    IsoDate,
    /// `MM-DD-YYYY`
    MonthDayYearDashed,
    /// `DD/MM/YYYY`
    DayMonthYear,
    /// `YYYYMMDD`
    CompactIso,
    /// `MM/DD/YY`
    MonthDayShortYear,
    /// `M/D/YYYY`
    LooseMonthDayYear,
    /// `M/D/YY`
    LooseMonthDayShortYear,
    /// `YYYY/MM/DD`
    YearMonthDaySlashed,
}

/// Format order used when the caller supplies none.
pub const DEFAULT_DATE_FORMATS: [DateFormat; 8] = [
    DateFormat::MonthDayYear,
    DateFormat::IsoDate,
    DateFormat::MonthDayYearDashed,
    DateFormat::DayMonthYear,
    DateFormat::CompactIso,
    DateFormat::MonthDayShortYear,
    DateFormat::LooseMonthDayYear,
    DateFormat::LooseMonthDayShortYear,
];

impl DateFormat {
    /// Every format, in declaration order.
    pub const ALL: [DateFormat; 9] = [
        Self::MonthDayYear,
        Self::IsoDate,
        Self::MonthDayYearDashed,
        Self::DayMonthYear,
        Self::CompactIso,
        Self::MonthDayShortYear,
        Self::LooseMonthDayYear,
        Self::LooseMonthDayShortYear,
        Self::YearMonthDaySlashed,
    ];

    /// Token spelling used in configuration files and detection hints.
    pub const fn token(&self) -> &'static str {
        match self {
            Self::MonthDayYear => "MM/DD/YYYY",
            Self::IsoDate => "YYYY-MM-DD",
            Self::MonthDayYearDashed => "MM-DD-YYYY",
            Self::DayMonthYear => "DD/MM/YYYY",
            Self::CompactIso => "YYYYMMDD",
            Self::MonthDayShortYear => "MM/DD/YY",
            Self::LooseMonthDayYear => "M/D/YYYY",
            Self::LooseMonthDayShortYear => "M/D/YY",
            Self::YearMonthDaySlashed => "YYYY/MM/DD",
        }
    }

    const fn pattern(&self) -> &'static str {
        match self {
            Self::MonthDayYear => r"^(?P<m>\d{2})/(?P<d>\d{2})/(?P<y>\d{4})$",
            Self::IsoDate => r"^(?P<y>\d{4})-(?P<m>\d{2})-(?P<d>\d{2})$",
            Self::MonthDayYearDashed => r"^(?P<m>\d{2})-(?P<d>\d{2})-(?P<y>\d{4})$",
            Self::DayMonthYear => r"^(?P<d>\d{2})/(?P<m>\d{2})/(?P<y>\d{4})$",
            Self::CompactIso => r"^(?P<y>\d{4})(?P<m>\d{2})(?P<d>\d{2})$",
            Self::MonthDayShortYear => r"^(?P<m>\d{2})/(?P<d>\d{2})/(?P<y>\d{2})$",
            Self::LooseMonthDayYear => r"^(?P<m>\d{1,2})/(?P<d>\d{1,2})/(?P<y>\d{4})$",
            Self::LooseMonthDayShortYear => r"^(?P<m>\d{1,2})/(?P<d>\d{1,2})/(?P<y>\d{2})$",
            Self::YearMonthDaySlashed => r"^(?P<y>\d{4})/(?P<m>\d{2})/(?P<d>\d{2})$",
        }
    }

    /// Compiled shape of this format.
    pub fn regex(&self) -> &'static Regex {
        static COMPILED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
            DateFormat::ALL
                .iter()
                .map(|format| Regex::new(format.pattern()).expect("Invalid date shape regex"))
                .collect()
        });
        &COMPILED[*self as usize]
    }

    /// True when `value` has this format's exact shape (calendar validity not checked).
    pub fn matches_shape(&self, value: &str) -> bool {
        self.regex().is_match(value.trim())
    }

    /// Strict parse: exact shape and a real calendar date.
    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        let caps = self.regex().captures(value.trim())?;
        let year_digits = caps.name("y")?.as_str();
        let year: i32 = year_digits.parse().ok()?;
        let year = if year_digits.len() == 2 {
            expand_two_digit_year(year)
        } else {
            year
        };
        let month: u32 = caps.name("m")?.as_str().parse().ok()?;
        let day: u32 = caps.name("d")?.as_str().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Two-digit years follow the POSIX `%y` pivot: 69-99 are 1900s, 00-68 are 2000s.
fn expand_two_digit_year(yy: i32) -> i32 {
    if yy < 69 { 2000 + yy } else { 1900 + yy }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error returned for an unrecognized date format token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDateFormat(pub String);

impl fmt::Display for UnknownDateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown date format: {}", self.0)
    }
}

impl std::error::Error for UnknownDateFormat {}

impl FromStr for DateFormat {
    type Err = UnknownDateFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.token().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownDateFormat(trimmed.to_string()))
    }
}

impl TryFrom<String> for DateFormat {
    type Error = UnknownDateFormat;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateFormat> for String {
    fn from(format: DateFormat) -> Self {
        format.token().to_string()
    }
}

const LENIENT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const LENIENT_DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%y",
];

/// Catch-all used only after every strict format failed.
fn parse_lenient(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.date_naive());
    }
    for format in LENIENT_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    LENIENT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Parses a date string against `formats` (or [`DEFAULT_DATE_FORMATS`] when empty).
pub fn parse_date_str(value: &str, formats: &[DateFormat]) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let formats = if formats.is_empty() {
        &DEFAULT_DATE_FORMATS[..]
    } else {
        formats
    };
    formats
        .iter()
        .find_map(|format| format.parse(trimmed))
        .or_else(|| parse_lenient(trimmed))
}

/// Parses a raw cell into a date. Blank cells yield `None`.
pub fn parse_date(value: &CellValue, formats: &[DateFormat]) -> Option<NaiveDate> {
    match value {
        CellValue::Null => None,
        other => parse_date_str(&other.as_text(), formats),
    }
}
