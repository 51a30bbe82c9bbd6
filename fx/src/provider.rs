//! Rate provider trait and test double.

use async_trait::async_trait;
use globex_common::Currency;

use crate::error::FxResult;
use crate::rate_table::RateTable;

/// Source of latest exchange rates.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Fetch every rate quoted against `base`.
    ///
    /// One call is one upstream request; implementations must not cache and
    /// must not retry.
    async fn get_rates(&self, base: &Currency) -> FxResult<RateTable>;
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockRateProvider;

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use dashmap::DashMap;
    use globex_common::Currency;
    use parking_lot::Mutex;

    use super::RateProvider;
    use crate::error::{FxError, FxResult};
    use crate::rate_table::RateTable;

    /// Mock rate provider for testing.
    pub struct MockRateProvider {
        name: String,
        tables: DashMap<Currency, RateTable>,
        delays: DashMap<Currency, Duration>,
        failure: Mutex<Option<FxError>>,
        requests: Mutex<Vec<Currency>>,
        calls: AtomicUsize,
    }

    impl MockRateProvider {
        /// Create a new mock provider.
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                tables: DashMap::new(),
                delays: DashMap::new(),
                failure: Mutex::new(None),
                requests: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        /// Set the table served for its base currency.
        pub fn set_table(&self, table: RateTable) {
            self.tables.insert(table.base.clone(), table);
        }

        /// Delay responses for one base currency.
        pub fn set_delay(&self, base: Currency, delay: Duration) {
            self.delays.insert(base, delay);
        }

        /// Fail every request with `error` until cleared with `None`.
        pub fn fail_with(&self, error: Option<FxError>) {
            *self.failure.lock() = error;
        }

        /// Number of `get_rates` calls so far.
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Base currencies requested, in call order.
        pub fn requests(&self) -> Vec<Currency> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl RateProvider for MockRateProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn get_rates(&self, base: &Currency) -> FxResult<RateTable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().push(base.clone());

            let delay = self.delays.get(base).map(|d| *d);
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(error) = self.failure.lock().clone() {
                return Err(error);
            }

            self.tables
                .get(base)
                .map(|t| t.clone())
                .ok_or_else(|| FxError::MissingRates(base.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mock_provider() {
        let provider = MockRateProvider::new("test");
        provider.set_table(RateTable::new(Currency::usd()).with_rate("EUR", dec!(0.92)));

        let table = tokio_test::assert_ok!(provider.get_rates(&Currency::usd()).await);

        assert_eq!(table.rate(&Currency::eur()), Some(dec!(0.92)));
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.requests(), vec![Currency::usd()]);
    }

    #[tokio::test]
    async fn test_mock_provider_failure() {
        let provider = MockRateProvider::new("test");
        provider.fail_with(Some(FxError::Api("quota-reached".to_string())));

        let result = provider.get_rates(&Currency::usd()).await;
        assert_eq!(result, Err(FxError::Api("quota-reached".to_string())));

        provider.fail_with(None);
        let result = provider.get_rates(&Currency::gbp()).await;
        assert!(matches!(result, Err(FxError::MissingRates(_))));
        assert_eq!(provider.call_count(), 2);
    }
}
