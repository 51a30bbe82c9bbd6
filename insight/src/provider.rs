//! Insight provider trait and test double.

use async_trait::async_trait;

use crate::error::InsightResult;
use crate::insight::{Insight, InsightRequest};

/// Source of generated currency insights.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Generate an insight for the request's primary pair.
    async fn get_insight(&self, request: &InsightRequest) -> InsightResult<Insight>;
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockInsightProvider;

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::InsightProvider;
    use crate::error::{InsightError, InsightResult};
    use crate::insight::{Insight, InsightRequest};

    /// Mock insight provider for testing.
    ///
    /// Answers with `"{BASE}/{QUOTE} insight"` unless a failure is set.
    pub struct MockInsightProvider {
        failure: Mutex<Option<InsightError>>,
        delay: Mutex<Option<Duration>>,
        requests: Mutex<Vec<InsightRequest>>,
        calls: AtomicUsize,
    }

    impl MockInsightProvider {
        /// Create a new mock provider.
        pub fn new() -> Self {
            Self {
                failure: Mutex::new(None),
                delay: Mutex::new(None),
                requests: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        /// Fail every request with `error` until cleared with `None`.
        pub fn fail_with(&self, error: Option<InsightError>) {
            *self.failure.lock() = error;
        }

        /// Delay every response.
        pub fn set_delay(&self, delay: Option<Duration>) {
            *self.delay.lock() = delay;
        }

        /// Number of `get_insight` calls so far.
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Requests received, in call order.
        pub fn requests(&self) -> Vec<InsightRequest> {
            self.requests.lock().clone()
        }

        /// Text the mock generates for a request.
        pub fn text_for(request: &InsightRequest) -> String {
            format!("{} insight", request.primary_pair())
        }
    }

    impl Default for MockInsightProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl InsightProvider for MockInsightProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn get_insight(&self, request: &InsightRequest) -> InsightResult<Insight> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().push(request.clone());

            let delay = *self.delay.lock();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(error) = self.failure.lock().clone() {
                return Err(error);
            }

            Ok(Insight::new(Self::text_for(request), "Mock disclaimer."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InsightError;
    use globex_common::Currency;

    #[tokio::test]
    async fn test_mock_provider() {
        let provider = MockInsightProvider::new();
        let request =
            InsightRequest::new(Currency::gbp(), vec![Currency::usd(), Currency::eur()]).unwrap();

        let insight = tokio_test::assert_ok!(provider.get_insight(&request).await);

        assert_eq!(insight.text, "GBP/USD insight");
        assert_eq!(provider.call_count(), 1);

        provider.fail_with(Some(InsightError::EmptyResponse));
        assert_eq!(
            provider.get_insight(&request).await,
            Err(InsightError::EmptyResponse)
        );
    }
}
