//! Property tests for the date and amount normalizers.

use chrono::{Datelike, NaiveDate};
use claims_model::CellValue;
use claims_transform::{
    DateFormat, amount_is_negative, parse_amount, parse_amount_str, parse_date, parse_date_str,
};
use proptest::prelude::*;

fn with_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

proptest! {
    /// Rendering an amount as plain text and parsing it back preserves it.
    #[test]
    fn amount_round_trips(cents in 0u64..1_000_000_000u64) {
        let expected = cents as f64 / 100.0;
        let text = format!("{}.{:02}", cents / 100, cents % 100);
        prop_assert!(close(parse_amount_str(&text), expected));
    }

    /// Currency decoration and sign never change the parsed magnitude.
    #[test]
    fn amount_sign_and_decoration_erased(cents in 0u64..1_000_000_000u64) {
        let plain = format!("{}.{:02}", cents / 100, cents % 100);
        let currency = format!("${}.{:02}", with_thousands(cents / 100), cents % 100);
        let negative = format!("-{currency}");
        let accounting = format!("({currency})");

        let base = parse_amount_str(&plain);
        prop_assert!(close(parse_amount_str(&currency), base));
        prop_assert!(close(parse_amount_str(&negative), base));
        prop_assert!(close(parse_amount_str(&accounting), base));
        prop_assert!(parse_amount_str(&negative) >= 0.0);
    }

    /// Parsing the rendered output of a parse is a no-op.
    #[test]
    fn amount_parse_is_idempotent(raw in "[-$(), 0-9.a-z]{0,16}") {
        let once = parse_amount_str(&raw);
        let twice = parse_amount(&CellValue::Text(once.to_string()));
        prop_assert!(close(once, twice));
        prop_assert!(once >= 0.0);
    }

    /// Any real calendar date written as MM/DD/YYYY parses back to itself.
    #[test]
    fn us_dates_round_trip(days in 0i64..40_000i64) {
        let base = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap();
        let date = base + chrono::Duration::days(days);
        let text = date.format("%m/%d/%Y").to_string();
        prop_assert_eq!(parse_date_str(&text, &[]), Some(date));
    }

    /// ISO and compact spellings round-trip with the default list.
    #[test]
    fn iso_and_compact_round_trip(days in 0i64..40_000i64) {
        let base = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap();
        let date = base + chrono::Duration::days(days);
        prop_assert_eq!(parse_date_str(&date.format("%Y-%m-%d").to_string(), &[]), Some(date));
        prop_assert_eq!(parse_date_str(&date.format("%Y%m%d").to_string(), &[]), Some(date));
    }

    /// Arbitrary text never panics the date parser.
    #[test]
    fn date_parser_never_panics(raw in "\\PC{0,24}") {
        let _ = parse_date_str(&raw, &[]);
    }
}

#[test]
fn invalid_calendar_date_is_rejected() {
    assert_eq!(parse_date_str("13/40/2024", &[]), None);
    assert_eq!(parse_date_str("02/30/2024", &[]), None);
    assert_eq!(parse_date_str("", &[]), None);
    assert_eq!(parse_date(&CellValue::Null, &[]), None);
}

#[test]
fn list_order_resolves_ambiguity() {
    let us_first = parse_date_str("02/03/2024", &[]).unwrap();
    assert_eq!((us_first.month(), us_first.day()), (2, 3));

    let day_first = parse_date_str("02/03/2024", &[DateFormat::DayMonthYear]).unwrap();
    assert_eq!((day_first.month(), day_first.day()), (3, 2));
}

#[test]
fn day_first_fallback_when_month_is_impossible() {
    assert_eq!(
        parse_date_str("25/12/2024", &[]),
        NaiveDate::from_ymd_opt(2024, 12, 25)
    );
}

#[test]
fn lenient_fallback_covers_datetimes_and_month_names() {
    let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
    assert_eq!(parse_date_str("2024-01-15T10:30:00Z", &[]), expected);
    assert_eq!(parse_date_str("2024-01-15 10:30:00", &[]), expected);
    assert_eq!(parse_date_str("Jan 15, 2024", &[]), expected);
    assert_eq!(parse_date_str("15-Jan-2024", &[]), expected);
    assert_eq!(parse_date_str("2024/01/15", &[]), expected);
}

#[test]
fn numeric_cells_are_rendered_before_parsing() {
    assert_eq!(
        parse_date(&CellValue::Number(20240115.0), &[]),
        NaiveDate::from_ymd_opt(2024, 1, 15)
    );
    assert_eq!(parse_amount(&CellValue::Number(-150.0)), 150.0);
}

#[test]
fn negative_sign_is_visible_before_parsing() {
    let raw = CellValue::from("-$150.00");
    assert!(amount_is_negative(&raw));
    assert_eq!(parse_amount(&raw), 150.0);
}
