//! Insight client error types.

use thiserror::Error;

/// Errors that can occur while generating insights.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightError {
    /// No API key configured for the generation service.
    #[error("Generation API key is not configured; set {var}")]
    MissingApiKey { var: String },

    /// Request never produced a response.
    #[error("Generation request failed: {0}")]
    Transport(String),

    /// Service answered with a non-success status.
    #[error("Generation service returned {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// Response carried no text candidate.
    #[error("Generation service returned no text")]
    EmptyResponse,

    /// Generated text does not match the output schema.
    #[error("Generated output is invalid: {0}")]
    InvalidOutput(String),

    /// Request named no quote currency.
    #[error("At least one quote currency is required")]
    NoQuoteCurrency,

    /// Client configuration is unusable.
    #[error("Invalid insight configuration: {0}")]
    InvalidConfig(String),
}

impl InsightError {
    /// Get error code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            InsightError::MissingApiKey { .. } => "MISSING_API_KEY",
            InsightError::Transport(_) => "TRANSPORT_ERROR",
            InsightError::HttpStatus { .. } => "HTTP_STATUS",
            InsightError::EmptyResponse => "EMPTY_RESPONSE",
            InsightError::InvalidOutput(_) => "INVALID_OUTPUT",
            InsightError::NoQuoteCurrency => "NO_QUOTE_CURRENCY",
            InsightError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

/// Result type for insight operations.
pub type InsightResult<T> = Result<T, InsightError>;
