//! Insight request and output types.

use globex_common::{Currency, CurrencyPair};
use serde::{Deserialize, Serialize};

use crate::error::{InsightError, InsightResult};

/// Insight text shown when generation fails.
pub const FALLBACK_INSIGHT: &str = "We encountered an issue while generating AI insights. \
This could be due to temporary network problems or limitations with the currency pair data. \
Please try again later or with a different currency pair.";

/// Disclaimer shown with the fallback insight.
pub const FALLBACK_DISCLAIMER: &str = "AI insights are for informational purposes only and \
should not be considered financial advice. Always consult with a qualified financial advisor \
before making investment decisions.";

/// Generated commentary about a currency pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Insights and tips for the primary pair.
    pub text: String,
    /// Not-financial-advice disclaimer.
    pub disclaimer: String,
}

impl Insight {
    /// Create a new insight.
    pub fn new(text: impl Into<String>, disclaimer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            disclaimer: disclaimer.into(),
        }
    }

    /// Generic insight used in place of a failed generation.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_INSIGHT, FALLBACK_DISCLAIMER)
    }
}

/// Base currency and one or more quote currencies to comment on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightRequest {
    base: Currency,
    quotes: Vec<Currency>,
}

impl InsightRequest {
    /// Create a request; at least one quote currency is required.
    pub fn new(base: Currency, quotes: Vec<Currency>) -> InsightResult<Self> {
        if quotes.is_empty() {
            return Err(InsightError::NoQuoteCurrency);
        }
        Ok(Self { base, quotes })
    }

    /// Base currency.
    pub fn base(&self) -> &Currency {
        &self.base
    }

    /// All quote currencies as given.
    pub fn quotes(&self) -> &[Currency] {
        &self.quotes
    }

    /// The pair commentary is generated for: base against the first quote.
    pub fn primary_pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.base.clone(), self.quotes[0].clone())
    }
}

/// Output schema of the generator.
///
/// `trend_reasoning` and `predicted_trend` are accepted so that a generator
/// emitting them still validates, but they never leave this crate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeneratedInsight {
    pub insights: String,
    pub disclaimer: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub trend_reasoning: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub predicted_trend: Option<String>,
}

impl GeneratedInsight {
    /// Parse generated JSON text, tolerating a Markdown code fence.
    pub fn parse(text: &str) -> InsightResult<Self> {
        let json = strip_code_fence(text);
        let generated: GeneratedInsight =
            serde_json::from_str(json).map_err(|e| InsightError::InvalidOutput(e.to_string()))?;

        if generated.insights.trim().is_empty() {
            return Err(InsightError::InvalidOutput("insights is empty".to_string()));
        }
        if generated.disclaimer.trim().is_empty() {
            return Err(InsightError::InvalidOutput("disclaimer is empty".to_string()));
        }

        Ok(generated)
    }

    /// Keep only the fields of the current output contract.
    pub fn into_insight(self) -> Insight {
        Insight::new(self.insights.trim(), self.disclaimer.trim())
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_requires_quote() {
        assert_eq!(
            InsightRequest::new(Currency::usd(), Vec::new()),
            Err(InsightError::NoQuoteCurrency)
        );
    }

    #[test]
    fn test_primary_pair_uses_first_quote() {
        let request =
            InsightRequest::new(Currency::usd(), vec![Currency::eur(), Currency::jpy()]).unwrap();
        assert_eq!(request.primary_pair().to_string(), "USD/EUR");
        assert_eq!(request.quotes().len(), 2);
    }

    #[test]
    fn test_optional_fields_are_dropped() {
        let text = r#"{
            "insights": "EUR tends to move with ECB policy.",
            "disclaimer": "Not financial advice.",
            "trendReasoning": "Rates diverged this week.",
            "predictedTrend": "Slightly up"
        }"#;

        let insight = GeneratedInsight::parse(text).unwrap().into_insight();

        assert_eq!(
            insight,
            Insight::new("EUR tends to move with ECB policy.", "Not financial advice.")
        );
    }

    #[test]
    fn test_code_fence_is_tolerated() {
        let text = "```json\n{\"insights\": \"a\", \"disclaimer\": \"b\"}\n```";
        let insight = GeneratedInsight::parse(text).unwrap().into_insight();
        assert_eq!(insight, Insight::new("a", "b"));
    }

    #[test]
    fn test_missing_disclaimer_is_invalid() {
        let result = GeneratedInsight::parse(r#"{"insights": "a"}"#);
        assert!(matches!(result, Err(InsightError::InvalidOutput(_))));

        let result = GeneratedInsight::parse(r#"{"insights": "a", "disclaimer": " "}"#);
        assert!(matches!(result, Err(InsightError::InvalidOutput(_))));
    }

    #[test]
    fn test_fallback() {
        let insight = Insight::fallback();
        assert_eq!(insight, Insight::new(FALLBACK_INSIGHT, FALLBACK_DISCLAIMER));
        assert!(insight.text.starts_with("We encountered an issue"));
        assert!(insight.disclaimer.ends_with("before making investment decisions."));
    }
}
