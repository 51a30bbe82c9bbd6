//! User edits, rejections and notices.

use globex_common::{CommonError, Currency};
use serde::Serialize;
use thiserror::Error;

/// A user edit to the conversion state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace the amount text.
    SetAmount(String),
    /// Select a new base currency.
    SetBaseCurrency(Currency),
    /// Replace the quote currency in a slot.
    SetQuoteCurrency { index: usize, code: Currency },
    /// Append the first available quote currency.
    AddQuoteCurrency,
    /// Remove the quote currency in a slot.
    RemoveQuoteCurrency(usize),
    /// Make the primary quote the base and the base a quote.
    SwapBaseWithPrimaryQuote,
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    /// Informational; nothing went wrong.
    Info,
    /// An edit or fetch failed.
    Error,
}

/// Reasons an edit is rejected. State is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Amount text is not a non-negative decimal literal.
    #[error("Amount must contain only digits and at most one decimal point: {0:?}")]
    InvalidAmount(String),

    /// Amount text is well formed but too large to convert.
    #[error("Amount is too large to convert: {0}")]
    AmountOutOfRange(String),

    /// Code is not in the currency catalog.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Base currency is a quote and no alternative exists to take its slot.
    #[error("Cannot select {0} as base: it is a quote currency and no other alternatives exist.")]
    BaseConflict(Currency),

    /// Quote selection equals the base currency.
    #[error("Cannot select the base currency {0} as a quote currency.")]
    QuoteIsBase(Currency),

    /// Quote selection already occupies another slot.
    #[error("Cannot select duplicate quote currency {0}.")]
    DuplicateQuote(Currency),

    /// No catalog currency left to add.
    #[error("No more unique currencies to add.")]
    NoCurrencyAvailable,

    /// Slot index does not exist.
    #[error("Quote slot {index} does not exist ({len} slots).")]
    SlotOutOfRange { index: usize, len: usize },
}

impl EditError {
    /// Severity shown to the user.
    pub fn level(&self) -> NoticeLevel {
        match self {
            EditError::NoCurrencyAvailable
            | EditError::InvalidAmount(_)
            | EditError::AmountOutOfRange(_) => NoticeLevel::Info,
            _ => NoticeLevel::Error,
        }
    }

    /// Get error code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            EditError::InvalidAmount(_) => "INVALID_AMOUNT",
            EditError::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            EditError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            EditError::BaseConflict(_) => "BASE_CONFLICT",
            EditError::QuoteIsBase(_) => "QUOTE_IS_BASE",
            EditError::DuplicateQuote(_) => "DUPLICATE_QUOTE",
            EditError::NoCurrencyAvailable => "NO_CURRENCY_AVAILABLE",
            EditError::SlotOutOfRange { .. } => "SLOT_OUT_OF_RANGE",
        }
    }
}

impl From<CommonError> for EditError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::UnknownCurrency(code) => EditError::UnknownCurrency(code),
            CommonError::InvalidAmount(text) => EditError::InvalidAmount(text),
            CommonError::AmountOutOfRange(text) => EditError::AmountOutOfRange(text),
        }
    }
}

/// Result type for state transitions.
pub type EditResult<T> = Result<T, EditError>;

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Short heading.
    pub title: String,
    /// Descriptive message.
    pub message: String,
}

impl Notice {
    /// Create an informational notice.
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Create an error notice.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

impl From<&EditError> for Notice {
    fn from(err: &EditError) -> Self {
        match err.level() {
            NoticeLevel::Info => Notice::info("Notice", err.to_string()),
            NoticeLevel::Error => Notice::error("Selection Error", err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_levels() {
        let notice = Notice::from(&EditError::DuplicateQuote(Currency::eur()));
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, "Selection Error");
        assert_eq!(notice.message, "Cannot select duplicate quote currency EUR.");

        let notice = Notice::from(&EditError::NoCurrencyAvailable);
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.message, "No more unique currencies to add.");
    }

    #[test]
    fn test_from_common_error() {
        let err: EditError = CommonError::UnknownCurrency("XYZ".to_string()).into();
        assert_eq!(err, EditError::UnknownCurrency("XYZ".to_string()));
        assert_eq!(err.error_code(), "UNKNOWN_CURRENCY");
    }
}
