//! Globex Insights
//!
//! Generates short commentary about a base/quote currency pair with a
//! text-generation service. Only the first quote currency is commented on,
//! and only the `insights` and `disclaimer` fields of the generator output
//! are ever returned.

pub mod config;
pub mod error;
pub mod gemini;
pub mod insight;
pub mod prompt;
pub mod provider;

pub use config::InsightConfig;
pub use error::{InsightError, InsightResult};
pub use gemini::GeminiInsightProvider;
pub use insight::{Insight, InsightRequest, FALLBACK_DISCLAIMER, FALLBACK_INSIGHT};
pub use provider::InsightProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockInsightProvider;
