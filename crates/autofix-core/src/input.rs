//! Input boundary: lenient parse-with-default helpers and caller errors.
//!
//! Mileage and price arrive as user-typed strings. A bad number never
//! aborts a valuation; it degrades to `0` km or [`DEFAULT_BASE_PRICE`].
//! Missing resources are different: they are reported to the caller.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::types::Money;

/// Base price used when no usable price is available.
pub const DEFAULT_BASE_PRICE: Money = 500_000;

lazy_static! {
    /// Optional sign and leading digits, ignoring anything after them.
    static ref LEADING_INTEGER: Regex = Regex::new(r"^\s*([+-]?)(\d+)").unwrap();
}

/// Caller-facing input failures. These fail one leg of a valuation,
/// never the whole valuation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} is required")]
    MissingRequiredField(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
}

impl InputError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequiredField(field.into())
    }
}

/// Parse an odometer reading, base 10, or `0` when no number leads the text.
///
/// Only the leading integer counts: `"45000 km"` is 45000 and `"45,000"`
/// is 45. Readings too large for `i64` saturate.
pub fn parse_km_or_zero(raw: &str) -> i64 {
    let Some(caps) = LEADING_INTEGER.captures(raw) else {
        return 0;
    };

    let negative = &caps[1] == "-";
    match caps[2].parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// Largest price magnitude accepted from user input.
const MAX_PRICE_MAGNITUDE: f64 = Money::MAX as f64;

/// Parse a base price, or [`DEFAULT_BASE_PRICE`] when the text is empty,
/// not a finite number, zero, or too large to hold as [`Money`].
///
/// Fractional prices round to whole units.
pub fn parse_price_or_default(raw: &str) -> Money {
    let trimmed = raw.trim();

    match trimmed.parse::<f64>().map(f64::round) {
        Ok(value) if value.is_finite() && value != 0.0 && value.abs() < MAX_PRICE_MAGNITUDE => {
            value as Money
        }
        _ => {
            tracing::debug!(raw = trimmed, "Unusable base price, using default");
            DEFAULT_BASE_PRICE
        }
    }
}

/// Require a non-blank field, trimming it.
pub fn require_field<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, InputError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| InputError::missing(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_km_plain() {
        assert_eq!(parse_km_or_zero("45000"), 45_000);
        assert_eq!(parse_km_or_zero("  12 "), 12);
        assert_eq!(parse_km_or_zero("+7"), 7);
    }

    #[test]
    fn test_parse_km_takes_leading_integer() {
        assert_eq!(parse_km_or_zero("45000 km"), 45_000);
        assert_eq!(parse_km_or_zero("45,000"), 45);
        assert_eq!(parse_km_or_zero("3.9"), 3);
    }

    #[test]
    fn test_parse_km_non_numeric_is_zero() {
        assert_eq!(parse_km_or_zero(""), 0);
        assert_eq!(parse_km_or_zero("abc"), 0);
        assert_eq!(parse_km_or_zero("km 45000"), 0);
    }

    #[test]
    fn test_parse_km_negative_is_passed_through() {
        assert_eq!(parse_km_or_zero("-500"), -500);
    }

    #[test]
    fn test_parse_km_saturates() {
        assert_eq!(parse_km_or_zero("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price_or_default("650000"), 650_000);
        assert_eq!(parse_price_or_default(" 420000 "), 420_000);
        assert_eq!(parse_price_or_default("1e5"), 100_000);
        assert_eq!(parse_price_or_default("450000.6"), 450_001);
    }

    #[test]
    fn test_parse_price_falls_back_to_default() {
        assert_eq!(parse_price_or_default(""), DEFAULT_BASE_PRICE);
        assert_eq!(parse_price_or_default("abc"), DEFAULT_BASE_PRICE);
        assert_eq!(parse_price_or_default("0"), DEFAULT_BASE_PRICE);
        assert_eq!(parse_price_or_default("450,000"), DEFAULT_BASE_PRICE);
        assert_eq!(parse_price_or_default("NaN"), DEFAULT_BASE_PRICE);
        assert_eq!(parse_price_or_default("inf"), DEFAULT_BASE_PRICE);
    }

    #[test]
    fn test_parse_price_out_of_range_falls_back() {
        assert_eq!(parse_price_or_default("1e19"), DEFAULT_BASE_PRICE);
        assert_eq!(parse_price_or_default("-1e19"), DEFAULT_BASE_PRICE);
        assert_eq!(parse_price_or_default("9223372036854775807"), DEFAULT_BASE_PRICE);
        assert_eq!(parse_price_or_default("1e15"), 1_000_000_000_000_000);
    }

    #[test]
    fn test_require_field() {
        assert_eq!(require_field(Some(" a.jpg "), "filename"), Ok("a.jpg"));
        assert_eq!(
            require_field(Some("   "), "filename"),
            Err(InputError::MissingRequiredField("filename".to_string()))
        );
        assert_eq!(
            require_field(None, "filename").unwrap_err().to_string(),
            "filename is required"
        );
    }
}
