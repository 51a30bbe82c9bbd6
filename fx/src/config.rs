//! Rate client configuration.

use std::time::Duration;

/// Default endpoint root of the ExchangeRate-API v6 service.
pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Default environment variable holding the API key.
pub const DEFAULT_API_KEY_VAR: &str = "EXCHANGERATE_API_KEY";

/// Configuration for the latest-rates client.
#[derive(Debug, Clone)]
pub struct RateClientConfig {
    /// Endpoint root; requests go to `{base_url}/{key}/latest/{BASE}`.
    pub base_url: String,
    /// Environment variable read on every request when no explicit key is set.
    pub api_key_var: String,
    /// Explicit API key, takes precedence over the environment.
    pub api_key: Option<String>,
    /// Optional whole-request timeout. `None` keeps the transport default.
    pub request_timeout: Option<Duration>,
}

impl Default for RateClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_var: DEFAULT_API_KEY_VAR.to_string(),
            api_key: None,
            request_timeout: None,
        }
    }
}

impl RateClientConfig {
    /// Load configuration from environment variables.
    ///
    /// The API key itself is not captured here; it is read at request time.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("EXCHANGERATE_API_BASE_URL") {
            config.base_url = url;
        }

        if let Ok(secs) = std::env::var("EXCHANGERATE_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.request_timeout = Some(Duration::from_secs(secs));
            }
        }

        config
    }

    /// Use an explicit API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Resolve the API key, consulting the environment at call time.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_var).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("Rate service base URL cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!("Rate service base URL must be http(s): {}", self.base_url));
        }

        if self.api_key_var.is_empty() {
            return Err("API key variable name cannot be empty".to_string());
        }

        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err("Request timeout cannot be zero".to_string());
        }

        Ok(())
    }
}
