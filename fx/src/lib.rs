//! Globex FX Rates
//!
//! Client for the latest-rates service and per-slot conversion helpers.
//!
//! # Example
//!
//! ```rust,ignore
//! use globex_fx::{ExchangeRateApiProvider, RateClientConfig, RateProvider};
//! use globex_common::Currency;
//!
//! let provider = ExchangeRateApiProvider::new(RateClientConfig::from_env())?;
//! let table = provider.get_rates(&Currency::usd()).await?;
//! let eur = table.rate(&Currency::eur());
//! ```

pub mod config;
pub mod conversion;
pub mod error;
pub mod exchange_rate_api;
pub mod provider;
pub mod rate_table;

pub use config::RateClientConfig;
pub use conversion::{convert_slots, SlotConversion};
pub use error::{FxError, FxResult};
pub use exchange_rate_api::ExchangeRateApiProvider;
pub use provider::RateProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockRateProvider;
pub use rate_table::RateTable;
