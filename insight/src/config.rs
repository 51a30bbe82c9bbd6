//! Insight client configuration.

use std::time::Duration;

/// Default Gemini REST endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for the insight generator.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// Endpoint root; requests go to `{base_url}/{model}:generateContent`.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Environment variables consulted in order on every request.
    pub api_key_vars: Vec<String>,
    /// Explicit API key, takes precedence over the environment.
    pub api_key: Option<String>,
    /// Optional whole-request timeout.
    pub request_timeout: Option<Duration>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_vars: vec!["GEMINI_API_KEY".to_string(), "GOOGLE_API_KEY".to_string()],
            api_key: None,
            request_timeout: None,
        }
    }
}

impl InsightConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("GEMINI_API_BASE_URL") {
            config.base_url = url;
        }

        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }

        if let Ok(secs) = std::env::var("GEMINI_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.request_timeout = Some(Duration::from_secs(secs));
            }
        }

        config
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use an explicit API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Resolve the API key at call time.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .iter()
            .cloned()
            .chain(self.api_key_vars.iter().filter_map(|var| std::env::var(var).ok()))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }

    /// Name reported when no key is found.
    pub fn primary_key_var(&self) -> &str {
        self.api_key_vars
            .first()
            .map(String::as_str)
            .unwrap_or("GEMINI_API_KEY")
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("Generation service base URL cannot be empty".to_string());
        }

        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        if self.api_key.is_none() && self.api_key_vars.is_empty() {
            return Err("No API key source configured".to_string());
        }

        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err("Request timeout cannot be zero".to_string());
        }

        Ok(())
    }
}
