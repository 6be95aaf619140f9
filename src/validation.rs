// Validation utilities module
// Custom validator functions for vendor and purchase-order fields

use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;
use validator::ValidationError;

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_\-./]*$").expect("static pattern compiles"))
}

/// Validates vendor codes and PO numbers: an alphanumeric first character
/// followed by alphanumerics, `_`, `-`, `.` or `/`. Whitespace is rejected.
pub fn validate_code(code: &str) -> Result<(), ValidationError> {
    if code_pattern().is_match(code) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_code_format"))
    }
}

/// Validates that a text field is not only whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("must_not_be_blank"))
    } else {
        Ok(())
    }
}

/// Upper bound for a line item's unit price
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Validates that a unit price lies in `0..=MAX_UNIT_PRICE`
pub fn validate_unit_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        Err(ValidationError::new("price_must_not_be_negative"))
    } else if *price > MAX_UNIT_PRICE {
        Err(ValidationError::new("price_too_large"))
    } else {
        Ok(())
    }
}

/// Highest quality rating a purchase order can carry
pub const MAX_QUALITY_RATING: f64 = 5.0;

/// Validates that a quality rating lies in `0.0..=MAX_QUALITY_RATING`
pub fn validate_quality_rating(rating: f64) -> Result<(), ValidationError> {
    if (0.0..=MAX_QUALITY_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_quality_rating"))
    }
}
