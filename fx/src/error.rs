//! Rate client error types.

use globex_common::Currency;
use thiserror::Error;

/// Errors that can occur while fetching exchange rates.
///
/// Every variant renders as a complete, user-presentable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    /// No API key configured for the rate service.
    #[error("Could not fetch exchange rates. API key is not configured; set {var} in the environment.")]
    MissingApiKey { var: String },

    /// Request never produced a response.
    #[error("Could not fetch exchange rates. Request failed: {0}")]
    Transport(String),

    /// Service answered with a non-success status.
    #[error(
        "Could not fetch exchange rates. Failed to fetch exchange rates: {status} - {}",
        .error_type.as_deref().unwrap_or("Unknown API error")
    )]
    HttpStatus {
        status: u16,
        error_type: Option<String>,
    },

    /// Successful response whose body reports an API-level error.
    #[error("Could not fetch exchange rates. API returned an error: {0}")]
    Api(String),

    /// Successful response without a rate mapping.
    #[error("Could not fetch exchange rates. No conversion rates returned for {0}.")]
    MissingRates(Currency),

    /// Body could not be decoded.
    #[error("Could not fetch exchange rates. Malformed response: {0}")]
    Decode(String),

    /// Client configuration is unusable.
    #[error("Could not fetch exchange rates. Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FxError {
    /// Get error code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::MissingApiKey { .. } => "MISSING_API_KEY",
            FxError::Transport(_) => "TRANSPORT_ERROR",
            FxError::HttpStatus { .. } => "HTTP_STATUS",
            FxError::Api(_) => "API_ERROR",
            FxError::MissingRates(_) => "MISSING_RATES",
            FxError::Decode(_) => "DECODE_ERROR",
            FxError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
