//! Coordinator configuration.

use std::time::Duration;

use globex_common::Currency;

use crate::state::{ConversionState, DEFAULT_AMOUNT};

/// Default quiet period before an amount edit triggers a rate fetch.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Main coordinator configuration.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Quiet period for amount edits.
    pub debounce: Duration,
    /// State the session starts from.
    pub initial_state: ConversionState,
    /// Pending edit commands before senders wait.
    pub command_buffer: usize,
    /// Notices kept for slow subscribers.
    pub notice_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            initial_state: ConversionState::default(),
            command_buffer: 64,
            notice_capacity: 32,
        }
    }
}

impl CoordinatorConfig {
    /// Load configuration from environment variables.
    ///
    /// `GLOBEX_BASE_CURRENCY` and `GLOBEX_QUOTE_CURRENCIES` (comma separated)
    /// replace the default selection only when together they form a valid state.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(ms) = std::env::var("GLOBEX_DEBOUNCE_MS") {
            if let Ok(ms) = ms.trim().parse() {
                config.debounce = Duration::from_millis(ms);
            }
        }

        let base = std::env::var("GLOBEX_BASE_CURRENCY").ok();
        let quotes = std::env::var("GLOBEX_QUOTE_CURRENCIES").ok();
        if base.is_some() || quotes.is_some() {
            let default = ConversionState::default();
            let base = base
                .map(Currency::new)
                .unwrap_or_else(|| default.base_currency().clone());
            let quotes = quotes
                .map(|list| parse_currency_list(&list))
                .unwrap_or_else(|| default.quote_currencies());

            if let Ok(state) = ConversionState::new(DEFAULT_AMOUNT, &base, &quotes) {
                config.initial_state = state;
            }
        }

        config
    }

    /// Set the debounce period.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the initial state.
    pub fn with_initial_state(mut self, state: ConversionState) -> Self {
        self.initial_state = state;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.command_buffer == 0 {
            return Err("Command buffer cannot be 0".to_string());
        }

        if self.notice_capacity == 0 {
            return Err("Notice capacity cannot be 0".to_string());
        }

        Ok(())
    }
}

/// Split a comma separated list of currency codes, skipping blanks.
pub fn parse_currency_list(list: &str) -> Vec<Currency> {
    list.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(Currency::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoordinatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert_eq!(config.initial_state, ConversionState::default());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = CoordinatorConfig::default();
        config.notice_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_currency_list() {
        assert_eq!(
            parse_currency_list(" eur, ,jpy "),
            vec![Currency::eur(), Currency::jpy()]
        );
        assert!(parse_currency_list("").is_empty());
    }
}
