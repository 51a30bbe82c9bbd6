//! Amount text validation and parsing.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{CommonError, Result};

// Partial or complete non-negative decimal literal: "", ".", "12.", ".5", "3.25".
static AMOUNT_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]*\.?[0-9]*$").expect("amount pattern is valid"));

/// Check whether `text` is acceptable as amount input.
pub fn is_valid_amount_text(text: &str) -> bool {
    AMOUNT_TEXT.is_match(text)
}

/// Validate amount input, returning the text unchanged on success.
///
/// Well-formed text whose value does not fit a `Decimal` is rejected as out
/// of range rather than being read as zero later.
pub fn validate_amount_text(text: &str) -> Result<&str> {
    if !is_valid_amount_text(text) {
        return Err(CommonError::InvalidAmount(text.to_string()));
    }

    match normalize(text) {
        Some(literal) if Decimal::from_str(&literal).is_err() => {
            Err(CommonError::AmountOutOfRange(text.to_string()))
        }
        _ => Ok(text),
    }
}

// "12." -> "12", ".5" -> "0.5"; None when nothing numeric remains.
fn normalize(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('.') {
        Some(format!("0{trimmed}"))
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse amount text into a positive amount.
///
/// Unparsable, empty, overflowing and non-positive inputs all yield zero.
pub fn parse_amount(text: &str) -> Decimal {
    let Some(literal) = normalize(text) else {
        return Decimal::ZERO;
    };

    match Decimal::from_str(&literal) {
        Ok(value) if value > Decimal::ZERO => value,
        _ => Decimal::ZERO,
    }
}
