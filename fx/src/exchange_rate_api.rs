//! ExchangeRate-API v6 latest-rates client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use globex_common::Currency;
use reqwest::header::{HeaderValue, CACHE_CONTROL, PRAGMA};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{error, info, instrument};

use crate::config::RateClientConfig;
use crate::error::{FxError, FxResult};
use crate::provider::RateProvider;
use crate::rate_table::RateTable;

/// Rate provider backed by the ExchangeRate-API `latest` endpoint.
#[derive(Clone)]
pub struct ExchangeRateApiProvider {
    client: Client,
    config: RateClientConfig,
}

impl ExchangeRateApiProvider {
    /// Create a provider, validating the configuration.
    pub fn new(config: RateClientConfig) -> FxResult<Self> {
        config.validate().map_err(FxError::InvalidConfig)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FxError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &RateClientConfig {
        &self.config
    }

    fn latest_url(&self, api_key: &str, base: &Currency) -> String {
        format!(
            "{}/{}/latest/{}",
            self.config.base_url.trim_end_matches('/'),
            api_key,
            base.code()
        )
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    fn name(&self) -> &str {
        "exchangerate-api"
    }

    #[instrument(skip(self), fields(base = %base))]
    async fn get_rates(&self, base: &Currency) -> FxResult<RateTable> {
        let api_key = self.config.resolve_api_key().ok_or_else(|| {
            error!(var = %self.config.api_key_var, "Rate service API key is missing");
            FxError::MissingApiKey {
                var: self.config.api_key_var.clone(),
            }
        })?;

        // The URL embeds the key, so it is stripped from transport errors.
        let response = self
            .client
            .get(self.latest_url(&api_key, base))
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"))
            .header(PRAGMA, HeaderValue::from_static("no-cache"))
            .send()
            .await
            .map_err(|e| FxError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FxError::Transport(e.without_url().to_string()))?;

        let table = interpret_response(status, &body, base)?;
        info!(rates = table.len(), "Fetched latest rates");
        Ok(table)
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: Option<String>,
    base_code: Option<String>,
    time_last_update_unix: Option<i64>,
    conversion_rates: Option<Map<String, Value>>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    error: Option<NestedError>,
}

#[derive(Debug, Deserialize)]
struct NestedError {
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

impl LatestResponse {
    fn error_type(&self) -> Option<String> {
        self.error_type
            .clone()
            .or_else(|| self.error.as_ref().and_then(|e| e.error_type.clone()))
    }
}

/// Map a raw HTTP status and body to a rate table or a uniform error.
pub(crate) fn interpret_response(
    status: StatusCode,
    body: &str,
    base: &Currency,
) -> FxResult<RateTable> {
    if !status.is_success() {
        let error_type = serde_json::from_str::<LatestResponse>(body)
            .ok()
            .and_then(|r| r.error_type());
        return Err(FxError::HttpStatus {
            status: status.as_u16(),
            error_type,
        });
    }

    let parsed: LatestResponse =
        serde_json::from_str(body).map_err(|e| FxError::Decode(e.to_string()))?;

    if parsed.result.as_deref() == Some("error") {
        let error_type = parsed.error_type().unwrap_or_else(|| "unknown-error".to_string());
        return Err(FxError::Api(error_type));
    }

    let rates = parsed
        .conversion_rates
        .as_ref()
        .ok_or_else(|| FxError::MissingRates(base.clone()))?;

    let table_base = parsed
        .base_code
        .as_deref()
        .map(Currency::new)
        .unwrap_or_else(|| base.clone());

    let mut table = RateTable::from_json(table_base, rates);
    if let Some(updated) = parsed
        .time_last_update_unix
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    {
        table = table.with_updated_at(updated);
    }

    Ok(table)
}
