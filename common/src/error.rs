//! Error types for shared currency handling.

use thiserror::Error;

/// Errors raised while validating currency codes and amount text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Code is not part of the currency catalog.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Amount text is not a non-negative decimal literal.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Amount text is well formed but too large to represent.
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),
}

impl CommonError {
    /// Get error code for notices and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            CommonError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            CommonError::InvalidAmount(_) => "INVALID_AMOUNT",
            CommonError::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
        }
    }
}

/// Result type alias for common operations.
pub type Result<T> = std::result::Result<T, CommonError>;
