//! Normalizers for loosely formatted claims values.
//!
//! - [`parse_date`]: strict, ordered format matching with a lenient fallback
//! - [`parse_amount`]: currency-like strings to non-negative numbers
//!
//! Both are pure and never fail; unusable input yields `None` / `0.0`.

pub mod normalization;

pub use normalization::datetime::{
    DEFAULT_DATE_FORMATS, DateFormat, UnknownDateFormat, parse_date, parse_date_str,
};
pub use normalization::numeric::{
    AmountFormat, UnknownAmountFormat, amount_is_negative, is_amount, parse_amount,
    parse_amount_str,
};
