//! Per-slot conversion of an amount into several quote currencies.

use globex_common::Currency;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::rate_table::RateTable;

/// Result for one quote slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SlotConversion {
    /// Rate used, absent when the table has no rate for the slot's code.
    pub rate: Option<Decimal>,
    /// `amount * rate`; absent when `rate` is, or when the product overflows.
    pub converted: Option<Decimal>,
}

impl SlotConversion {
    /// Slot with no known rate.
    pub const ABSENT: SlotConversion = SlotConversion {
        rate: None,
        converted: None,
    };

    /// Convert `amount` at `rate`. The rate is kept even when the product
    /// does not fit a `Decimal`.
    pub fn at_rate(amount: Decimal, rate: Decimal) -> Self {
        Self {
            rate: Some(rate),
            converted: amount.checked_mul(rate),
        }
    }

    /// Slot for a zero amount: nothing fetched, converts to zero.
    pub fn zero() -> Self {
        Self {
            rate: None,
            converted: Some(Decimal::ZERO),
        }
    }
}

/// Convert `amount` for each quote in order using `table`.
///
/// A quote missing from the table only affects its own slot.
pub fn convert_slots(amount: Decimal, quotes: &[Currency], table: &RateTable) -> Vec<SlotConversion> {
    quotes
        .iter()
        .map(|quote| match table.rate(quote) {
            Some(rate) => {
                let slot = SlotConversion::at_rate(amount, rate);
                if slot.converted.is_none() {
                    warn!(%amount, %rate, quote = %quote, "Converted amount overflows");
                }
                slot
            }
            None => {
                warn!(base = %table.base, quote = %quote, "Rate not found in response");
                SlotConversion::ABSENT
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn usd_table() -> RateTable {
        RateTable::new(Currency::usd())
            .with_rate("EUR", dec!(0.9))
            .with_rate("JPY", dec!(150))
    }

    #[test]
    fn test_convert_slots() {
        let slots = convert_slots(dec!(2.50), &[Currency::eur(), Currency::jpy()], &usd_table());

        assert_eq!(slots[0].rate, Some(dec!(0.9)));
        assert_eq!(slots[0].converted, Some(dec!(2.25)));
        assert_eq!(slots[1].rate, Some(dec!(150)));
        assert_eq!(slots[1].converted, Some(dec!(375)));
    }

    #[test]
    fn test_missing_quote_is_isolated() {
        let table = RateTable::new(Currency::usd()).with_rate("EUR", dec!(0.9));
        let slots = convert_slots(dec!(10), &[Currency::eur(), Currency::jpy()], &table);

        assert_eq!(slots[0].converted, Some(dec!(9)));
        assert_eq!(slots[1], SlotConversion::ABSENT);
    }

    #[test]
    fn test_overflow_blanks_only_its_slot() {
        let amount = dec!(9999999999999999999999999999);
        let slots = convert_slots(amount, &[Currency::eur(), Currency::jpy()], &usd_table());

        assert_eq!(slots[0].converted, Some(amount * dec!(0.9)));
        assert_eq!(slots[1].rate, Some(dec!(150)));
        assert_eq!(slots[1].converted, None);
    }

    #[test]
    fn test_zero_slot() {
        let slot = SlotConversion::zero();
        assert_eq!(slot.rate, None);
        assert_eq!(slot.converted, Some(Decimal::ZERO));
    }

    proptest! {
        #[test]
        fn prop_slots_follow_quotes(cents in 1u64..10_000_000, jpy_missing in any::<bool>()) {
            let amount = Decimal::new(cents as i64, 2);
            let mut table = RateTable::new(Currency::usd()).with_rate("EUR", dec!(0.9));
            if !jpy_missing {
                table = table.with_rate("JPY", dec!(150));
            }
            let quotes = [Currency::eur(), Currency::jpy(), Currency::gbp()];

            let slots = convert_slots(amount, &quotes, &table);

            prop_assert_eq!(slots.len(), quotes.len());
            prop_assert_eq!(slots[0].converted, Some(amount * dec!(0.9)));
            prop_assert_eq!(slots[1].rate.is_none(), jpy_missing);
            prop_assert_eq!(slots[2], SlotConversion::ABSENT);
        }
    }
}
