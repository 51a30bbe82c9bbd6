//! Fixed catalog of supported currencies.
//!
//! The catalog order matters: automatic substitutions (base conflict
//! resolution, adding a quote slot, swap fallback) always pick the first
//! eligible entry.

use serde::Serialize;

use crate::error::{CommonError, Result};
use crate::monetary::Currency;

/// Display metadata for a catalog currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    /// ISO 4217 code.
    pub code: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// ISO 3166-1 alpha-2 region used for flags ("EU" for the euro).
    pub region_code: &'static str,
}

impl CurrencyInfo {
    const fn new(code: &'static str, display_name: &'static str, region_code: &'static str) -> Self {
        Self {
            code,
            display_name,
            region_code,
        }
    }

    /// The entry as a [`Currency`].
    pub fn currency(&self) -> Currency {
        Currency::new(self.code)
    }
}

static CATALOG: [CurrencyInfo; 15] = [
    CurrencyInfo::new("USD", "United States Dollar", "US"),
    CurrencyInfo::new("EUR", "Euro", "EU"),
    CurrencyInfo::new("JPY", "Japanese Yen", "JP"),
    CurrencyInfo::new("GBP", "British Pound Sterling", "GB"),
    CurrencyInfo::new("AUD", "Australian Dollar", "AU"),
    CurrencyInfo::new("CAD", "Canadian Dollar", "CA"),
    CurrencyInfo::new("CHF", "Swiss Franc", "CH"),
    CurrencyInfo::new("CNY", "Chinese Yuan", "CN"),
    CurrencyInfo::new("INR", "Indian Rupee", "IN"),
    CurrencyInfo::new("BRL", "Brazilian Real", "BR"),
    CurrencyInfo::new("ZAR", "South African Rand", "ZA"),
    CurrencyInfo::new("NZD", "New Zealand Dollar", "NZ"),
    CurrencyInfo::new("SGD", "Singapore Dollar", "SG"),
    CurrencyInfo::new("MXN", "Mexican Peso", "MX"),
    CurrencyInfo::new("HKD", "Hong Kong Dollar", "HK"),
];

/// All catalog entries in catalog order.
pub fn catalog() -> &'static [CurrencyInfo] {
    &CATALOG
}

/// Look up a catalog entry by code (case-insensitive).
pub fn lookup(code: &str) -> Option<&'static CurrencyInfo> {
    let code = code.trim();
    CATALOG.iter().find(|info| info.code.eq_ignore_ascii_case(code))
}

/// Resolve a user-supplied code to a catalog currency.
pub fn resolve(code: &str) -> Result<Currency> {
    lookup(code)
        .map(CurrencyInfo::currency)
        .ok_or_else(|| CommonError::UnknownCurrency(code.trim().to_string()))
}

/// Region code for a currency, empty when the code is not in the catalog.
pub fn region_code(currency: &Currency) -> &'static str {
    lookup(currency.code()).map(|info| info.region_code).unwrap_or("")
}

/// First catalog currency accepted by `eligible`.
pub fn first_eligible(mut eligible: impl FnMut(&Currency) -> bool) -> Option<Currency> {
    CATALOG
        .iter()
        .map(CurrencyInfo::currency)
        .find(|currency| eligible(currency))
}
