//! Rate mapping returned by a single latest-rates lookup.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use globex_common::Currency;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Latest rates for one base currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    /// Currency the rates are quoted against.
    pub base: Currency,
    /// Quote code to multiplier, positive entries only.
    rates: BTreeMap<String, Decimal>,
    /// When the service last refreshed the rates, if reported.
    pub updated_at: Option<DateTime<Utc>>,
}

impl RateTable {
    /// Create an empty table.
    pub fn new(base: Currency) -> Self {
        Self {
            base,
            rates: BTreeMap::new(),
            updated_at: None,
        }
    }

    /// Add a rate. Non-positive rates are ignored.
    pub fn with_rate(mut self, quote: impl Into<Currency>, rate: Decimal) -> Self {
        self.insert(quote.into(), rate);
        self
    }

    /// Set the last-update timestamp.
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Build a table from the service's JSON `conversion_rates` object.
    ///
    /// Entries that are not numbers, or not positive, are dropped.
    pub fn from_json(base: Currency, raw: &Map<String, Value>) -> Self {
        let mut table = Self::new(base);
        for (code, value) in raw {
            let rate = match value {
                Value::Number(n) => decimal_from_number(&n.to_string()),
                _ => None,
            };
            match rate {
                Some(rate) => table.insert(Currency::new(code.as_str()), rate),
                None => debug!(code = %code, value = %value, "Skipping non-numeric rate"),
            }
        }
        table
    }

    /// Rate for a quote currency.
    pub fn rate(&self, quote: &Currency) -> Option<Decimal> {
        self.rates.get(quote.code()).copied()
    }

    /// Number of rates in the table.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if the table has no rates.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    fn insert(&mut self, quote: Currency, rate: Decimal) {
        if rate > Decimal::ZERO {
            self.rates.insert(quote.code().to_string(), rate);
        }
    }
}

// JSON numbers are rendered in their shortest round-trip form, so 0.9 stays 0.9.
fn decimal_from_number(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_exact_values() {
        let raw = json!({"USD": 1, "EUR": 0.9, "JPY": 150.25});
        let table = RateTable::from_json(Currency::usd(), raw.as_object().unwrap());

        assert_eq!(table.len(), 3);
        assert_eq!(table.rate(&Currency::eur()), Some(dec!(0.9)));
        assert_eq!(table.rate(&Currency::jpy()), Some(dec!(150.25)));
        assert_eq!(table.rate(&Currency::usd()), Some(dec!(1)));
    }

    #[test]
    fn test_from_json_drops_unusable_entries() {
        let raw = json!({"EUR": "0.9", "JPY": null, "GBP": 0, "CHF": -1.5, "INR": 83.1});
        let table = RateTable::from_json(Currency::usd(), raw.as_object().unwrap());

        assert_eq!(table.len(), 1);
        assert_eq!(table.rate(&Currency::inr()), Some(dec!(83.1)));
        assert_eq!(table.rate(&Currency::eur()), None);
    }

    #[test]
    fn test_scientific_notation() {
        let raw = json!({"BTC": 1.5e-5});
        let table = RateTable::from_json(Currency::usd(), raw.as_object().unwrap());
        assert_eq!(table.rate(&Currency::new("BTC")), Some(dec!(0.000015)));
    }
}
