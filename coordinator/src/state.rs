//! Conversion session state and its transitions.
//!
//! Every user edit is a pure function from the current state to either a new
//! state or an [`EditError`]; a rejected edit never touches the state. Quote
//! currencies, rates and converted amounts live together in [`QuoteSlot`]s, so
//! the three sequences cannot drift out of alignment.

use std::iter;

use globex_common::{first_eligible, parse_amount, resolve, validate_amount_text, Currency};
use globex_fx::{convert_slots, RateTable, SlotConversion};
use globex_insight::Insight;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::edit::{Edit, EditError, EditResult};

/// Maximum number of tracked quote currencies.
pub const MAX_QUOTE_CURRENCIES: usize = 3;

/// Amount text of a fresh session.
pub const DEFAULT_AMOUNT: &str = "1.00";

/// One quote currency with its last known rate and converted amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteSlot {
    /// Quote currency.
    pub currency: Currency,
    /// Last fetched rate; absent when unknown or missing from the response.
    pub rate: Option<Decimal>,
    /// Amount in the quote currency, derived from `rate`.
    pub converted: Option<Decimal>,
}

impl QuoteSlot {
    fn new(currency: Currency) -> Self {
        Self {
            currency,
            rate: None,
            converted: None,
        }
    }

    fn set(&mut self, conversion: SlotConversion) {
        self.rate = conversion.rate;
        self.converted = conversion.converted;
    }
}

/// Live, user-editable conversion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionState {
    amount_text: String,
    base: Currency,
    slots: Vec<QuoteSlot>,
    insight: Option<Insight>,
}

impl Default for ConversionState {
    fn default() -> Self {
        Self {
            amount_text: DEFAULT_AMOUNT.to_string(),
            base: Currency::usd(),
            slots: [Currency::eur(), Currency::jpy(), Currency::inr()]
                .into_iter()
                .map(QuoteSlot::new)
                .collect(),
            insight: None,
        }
    }
}

impl ConversionState {
    /// Build a validated state.
    pub fn new(amount_text: &str, base: &Currency, quotes: &[Currency]) -> EditResult<Self> {
        validate_amount_text(amount_text)?;
        let base = resolve(base.code())?;

        if quotes.is_empty() {
            return Err(EditError::SlotOutOfRange { index: 0, len: 0 });
        }
        if quotes.len() > MAX_QUOTE_CURRENCIES {
            return Err(EditError::SlotOutOfRange {
                index: quotes.len() - 1,
                len: MAX_QUOTE_CURRENCIES,
            });
        }

        let mut slots: Vec<QuoteSlot> = Vec::with_capacity(quotes.len());
        for quote in quotes {
            let quote = resolve(quote.code())?;
            if quote == base {
                return Err(EditError::QuoteIsBase(quote));
            }
            if slots.iter().any(|s| s.currency == quote) {
                return Err(EditError::DuplicateQuote(quote));
            }
            slots.push(QuoteSlot::new(quote));
        }

        Ok(Self {
            amount_text: amount_text.to_string(),
            base,
            slots,
            insight: None,
        })
    }

    /// Raw amount text.
    pub fn amount_text(&self) -> &str {
        &self.amount_text
    }

    /// Parsed amount; zero when unparsable or non-positive.
    pub fn amount(&self) -> Decimal {
        parse_amount(&self.amount_text)
    }

    /// Base currency.
    pub fn base_currency(&self) -> &Currency {
        &self.base
    }

    /// Quote slots in order.
    pub fn slots(&self) -> &[QuoteSlot] {
        &self.slots
    }

    /// Quote currencies in order.
    pub fn quote_currencies(&self) -> Vec<Currency> {
        self.slots.iter().map(|s| s.currency.clone()).collect()
    }

    /// Rates, aligned with the quote currencies.
    pub fn rates(&self) -> Vec<Option<Decimal>> {
        self.slots.iter().map(|s| s.rate).collect()
    }

    /// Converted amounts, aligned with the quote currencies.
    pub fn converted_amounts(&self) -> Vec<Option<Decimal>> {
        self.slots.iter().map(|s| s.converted).collect()
    }

    /// Last fetched insight for the current selection.
    pub fn insight(&self) -> Option<&Insight> {
        self.insight.as_ref()
    }

    /// Whether `other` has the same base and quote currencies in the same order.
    pub fn same_selection(&self, other: &ConversionState) -> bool {
        self.base == other.base
            && self.slots.len() == other.slots.len()
            && self
                .slots
                .iter()
                .zip(&other.slots)
                .all(|(a, b)| a.currency == b.currency)
    }

    fn contains_quote(&self, currency: &Currency) -> bool {
        self.slots.iter().any(|s| &s.currency == currency)
    }

    fn check_index(&self, index: usize) -> EditResult<()> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(EditError::SlotOutOfRange {
                index,
                len: self.slots.len(),
            })
        }
    }

    // Selection changed: previous rates and insight no longer describe it.
    fn reset_results(&mut self) {
        for slot in &mut self.slots {
            slot.set(SlotConversion::ABSENT);
        }
        self.insight = None;
    }

    /// Apply any edit.
    pub fn apply(&self, edit: &Edit) -> EditResult<Self> {
        match edit {
            Edit::SetAmount(text) => self.set_amount(text),
            Edit::SetBaseCurrency(code) => self.set_base_currency(code),
            Edit::SetQuoteCurrency { index, code } => self.set_quote_currency(*index, code),
            Edit::AddQuoteCurrency => self.add_quote_currency(),
            Edit::RemoveQuoteCurrency(index) => self.remove_quote_currency(*index),
            Edit::SwapBaseWithPrimaryQuote => Ok(self.swap_base_with_primary_quote()),
        }
    }

    /// Replace the amount text if it is a valid partial decimal literal.
    pub fn set_amount(&self, text: &str) -> EditResult<Self> {
        validate_amount_text(text)?;
        let mut next = self.clone();
        next.amount_text = text.to_string();
        Ok(next)
    }

    /// Select a new base currency.
    ///
    /// If the code is currently a quote, that slot is handed to the first
    /// catalog currency that is neither the new base nor already quoted.
    pub fn set_base_currency(&self, code: &Currency) -> EditResult<Self> {
        let code = resolve(code.code())?;
        if code == self.base {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        if let Some(index) = self.slots.iter().position(|s| s.currency == code) {
            let alternative = first_eligible(|c| *c != code && !self.contains_quote(c))
                .ok_or_else(|| EditError::BaseConflict(code.clone()))?;
            next.slots[index] = QuoteSlot::new(alternative);
        }

        next.base = code;
        next.reset_results();
        Ok(next)
    }

    /// Replace the quote currency in slot `index`.
    pub fn set_quote_currency(&self, index: usize, code: &Currency) -> EditResult<Self> {
        self.check_index(index)?;
        let code = resolve(code.code())?;

        if code == self.base {
            return Err(EditError::QuoteIsBase(code));
        }
        if self
            .slots
            .iter()
            .enumerate()
            .any(|(i, s)| i != index && s.currency == code)
        {
            return Err(EditError::DuplicateQuote(code));
        }
        if self.slots[index].currency == code {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        next.slots[index] = QuoteSlot::new(code);
        next.insight = None;
        Ok(next)
    }

    /// Append the first catalog currency that is neither base nor quoted.
    ///
    /// Unchanged when the maximum number of slots is reached.
    pub fn add_quote_currency(&self) -> EditResult<Self> {
        if self.slots.len() >= MAX_QUOTE_CURRENCIES {
            return Ok(self.clone());
        }

        let code = first_eligible(|c| *c != self.base && !self.contains_quote(c))
            .ok_or(EditError::NoCurrencyAvailable)?;

        let mut next = self.clone();
        next.slots.push(QuoteSlot::new(code));
        next.insight = None;
        Ok(next)
    }

    /// Remove slot `index`. Unchanged when only one slot remains.
    pub fn remove_quote_currency(&self, index: usize) -> EditResult<Self> {
        if self.slots.len() <= 1 {
            return Ok(self.clone());
        }
        self.check_index(index)?;

        let mut next = self.clone();
        next.slots.remove(index);
        next.insight = None;
        Ok(next)
    }

    /// Make the primary quote the base; the old base becomes the primary quote.
    pub fn swap_base_with_primary_quote(&self) -> Self {
        let Some(first) = self.slots.first() else {
            return self.clone();
        };

        let new_base = first.currency.clone();
        let old_base = self.base.clone();

        let mut quotes: Vec<Currency> = iter::once(old_base.clone())
            .chain(self.slots[1..].iter().map(|s| s.currency.clone()))
            .filter(|c| *c != new_base)
            .collect();
        if quotes.is_empty() {
            quotes = first_eligible(|c| *c != new_base && *c != old_base)
                .into_iter()
                .collect();
        }
        quotes.truncate(MAX_QUOTE_CURRENCIES);

        let mut next = self.clone();
        next.base = new_base;
        next.slots = quotes.into_iter().map(QuoteSlot::new).collect();
        next.insight = None;
        next
    }

    /// Amount is zero: every slot converts to zero with no rate.
    pub fn apply_zero_amount(&mut self) {
        for slot in &mut self.slots {
            slot.set(SlotConversion::zero());
        }
    }

    /// Fill every slot from a fetched table.
    pub fn apply_rates(&mut self, amount: Decimal, table: &RateTable) {
        let conversions = convert_slots(amount, &self.quote_currencies(), table);
        for (slot, conversion) in self.slots.iter_mut().zip(conversions) {
            slot.set(conversion);
        }
    }

    /// Rate fetch failed: every slot becomes absent.
    pub fn clear_rates(&mut self) {
        for slot in &mut self.slots {
            slot.set(SlotConversion::ABSENT);
        }
    }

    /// Store the insight for the current selection.
    pub fn set_insight(&mut self, insight: Option<Insight>) {
        self.insight = insight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use globex_common::catalog;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn codes(state: &ConversionState) -> Vec<String> {
        state
            .quote_currencies()
            .iter()
            .map(|c| c.code().to_string())
            .collect()
    }

    fn state(base: &str, quotes: &[&str]) -> ConversionState {
        let quotes: Vec<Currency> = quotes.iter().map(|q| Currency::new(*q)).collect();
        ConversionState::new("1.00", &Currency::new(base), &quotes).unwrap()
    }

    #[test]
    fn test_default_state() {
        let state = ConversionState::default();
        assert_eq!(state.amount_text(), "1.00");
        assert_eq!(state.base_currency(), &Currency::usd());
        assert_eq!(codes(&state), vec!["EUR", "JPY", "INR"]);
        assert_eq!(state.rates(), vec![None, None, None]);
        assert!(state.insight().is_none());
    }

    #[test]
    fn test_new_validates() {
        let usd = Currency::usd();
        assert_eq!(
            ConversionState::new("1", &usd, &[Currency::usd()]),
            Err(EditError::QuoteIsBase(Currency::usd()))
        );
        assert_eq!(
            ConversionState::new("1", &usd, &[Currency::eur(), Currency::eur()]),
            Err(EditError::DuplicateQuote(Currency::eur()))
        );
        assert!(ConversionState::new("1", &usd, &[]).is_err());
        assert!(ConversionState::new("x", &usd, &[Currency::eur()]).is_err());
        assert!(ConversionState::new("1", &Currency::new("XYZ"), &[Currency::eur()]).is_err());
    }

    #[test]
    fn test_set_amount() {
        let state = ConversionState::default();
        let next = state.set_amount("2.5").unwrap();
        assert_eq!(next.amount_text(), "2.5");
        assert_eq!(next.amount(), dec!(2.5));

        assert_eq!(
            state.set_amount("2.5.1"),
            Err(EditError::InvalidAmount("2.5.1".to_string()))
        );
        assert_eq!(state.set_amount("").unwrap().amount(), Decimal::ZERO);

        let too_large = "100000000000000000000000000000";
        assert_eq!(
            state.set_amount(too_large),
            Err(EditError::AmountOutOfRange(too_large.to_string()))
        );
    }

    #[test]
    fn test_set_base_plain() {
        let next = ConversionState::default()
            .set_base_currency(&Currency::gbp())
            .unwrap();
        assert_eq!(next.base_currency(), &Currency::gbp());
        assert_eq!(codes(&next), vec!["EUR", "JPY", "INR"]);
    }

    #[test]
    fn test_set_base_substitutes_conflicting_quote() {
        // EUR becomes base; its slot goes to the first free catalog code, USD.
        let next = ConversionState::default()
            .set_base_currency(&Currency::eur())
            .unwrap();
        assert_eq!(next.base_currency(), &Currency::eur());
        assert_eq!(codes(&next), vec!["USD", "JPY", "INR"]);
    }

    #[test]
    fn test_set_base_clears_results() {
        let mut state = ConversionState::default();
        state.apply_rates(dec!(1), &RateTable::new(Currency::usd()).with_rate("EUR", dec!(0.9)));
        state.set_insight(Some(Insight::new("a", "b")));

        let next = state.set_base_currency(&Currency::gbp()).unwrap();

        assert_eq!(next.rates(), vec![None, None, None]);
        assert!(next.insight().is_none());
    }

    #[test]
    fn test_set_base_unknown() {
        let state = ConversionState::default();
        assert_eq!(
            state.set_base_currency(&Currency::new("XYZ")),
            Err(EditError::UnknownCurrency("XYZ".to_string()))
        );
    }

    #[test]
    fn test_set_quote() {
        let state = ConversionState::default();
        let next = state.set_quote_currency(1, &Currency::gbp()).unwrap();
        assert_eq!(codes(&next), vec!["EUR", "GBP", "INR"]);

        assert_eq!(
            state.set_quote_currency(1, &Currency::usd()),
            Err(EditError::QuoteIsBase(Currency::usd()))
        );
        assert_eq!(
            state.set_quote_currency(1, &Currency::eur()),
            Err(EditError::DuplicateQuote(Currency::eur()))
        );
        assert_eq!(
            state.set_quote_currency(3, &Currency::gbp()),
            Err(EditError::SlotOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(state.set_quote_currency(0, &Currency::eur()).unwrap(), state);
    }

    #[test]
    fn test_set_quote_resets_only_that_slot() {
        let mut state = ConversionState::default();
        let table = RateTable::new(Currency::usd())
            .with_rate("EUR", dec!(0.9))
            .with_rate("JPY", dec!(150))
            .with_rate("INR", dec!(83));
        state.apply_rates(dec!(1), &table);

        let next = state.set_quote_currency(1, &Currency::gbp()).unwrap();

        assert_eq!(next.rates(), vec![Some(dec!(0.9)), None, Some(dec!(83))]);
    }

    #[test]
    fn test_add_quote() {
        let state = state("USD", &["EUR"]);
        let next = state.add_quote_currency().unwrap();
        assert_eq!(codes(&next), vec!["EUR", "JPY"]);
        assert_eq!(next.rates(), vec![None, None]);
        assert_eq!(next.converted_amounts().len(), 2);
    }

    #[test]
    fn test_add_quote_at_max_is_noop() {
        let state = ConversionState::default();
        assert_eq!(state.add_quote_currency().unwrap(), state);
    }

    #[test]
    fn test_remove_quote() {
        let state = ConversionState::default();
        let next = state.remove_quote_currency(1).unwrap();
        assert_eq!(codes(&next), vec!["EUR", "INR"]);
        assert_eq!(
            state.remove_quote_currency(5),
            Err(EditError::SlotOutOfRange { index: 5, len: 3 })
        );
    }

    #[test]
    fn test_remove_last_quote_is_noop() {
        let state = state("USD", &["EUR"]);
        assert_eq!(state.remove_quote_currency(0).unwrap(), state);
    }

    #[test]
    fn test_swap() {
        let next = state("USD", &["EUR", "JPY"]).swap_base_with_primary_quote();
        assert_eq!(next.base_currency(), &Currency::eur());
        assert_eq!(codes(&next), vec!["USD", "JPY"]);
    }

    #[test]
    fn test_swap_single_quote() {
        let next = state("USD", &["EUR"]).swap_base_with_primary_quote();
        assert_eq!(next.base_currency(), &Currency::eur());
        assert_eq!(codes(&next), vec!["USD"]);
    }

    #[test]
    fn test_apply_rates() {
        let mut state = state("USD", &["EUR", "JPY"]).set_amount("2.50").unwrap();
        let table = RateTable::new(Currency::usd())
            .with_rate("EUR", dec!(0.9))
            .with_rate("JPY", dec!(150));

        let amount = state.amount();
        state.apply_rates(amount, &table);

        assert_eq!(state.converted_amounts(), vec![Some(dec!(2.25)), Some(dec!(375))]);
        assert_eq!(state.rates(), vec![Some(dec!(0.9)), Some(dec!(150))]);
    }

    #[test]
    fn test_apply_rates_missing_code() {
        let mut state = state("USD", &["EUR", "JPY"]);
        let table = RateTable::new(Currency::usd()).with_rate("EUR", dec!(0.9));

        state.apply_rates(dec!(2), &table);

        assert_eq!(state.rates(), vec![Some(dec!(0.9)), None]);
        assert_eq!(state.converted_amounts(), vec![Some(dec!(1.8)), None]);
    }

    #[test]
    fn test_zero_amount_and_failure() {
        let mut state = state("USD", &["EUR", "JPY"]);
        state.apply_zero_amount();
        assert_eq!(state.rates(), vec![None, None]);
        assert_eq!(
            state.converted_amounts(),
            vec![Some(Decimal::ZERO), Some(Decimal::ZERO)]
        );

        state.clear_rates();
        assert_eq!(state.converted_amounts(), vec![None, None]);
    }

    #[test]
    fn test_same_selection() {
        let a = ConversionState::default();
        let b = a.set_amount("5").unwrap();
        assert!(a.same_selection(&b));
        assert!(!a.same_selection(&a.swap_base_with_primary_quote()));
        assert!(!a.same_selection(&a.remove_quote_currency(2).unwrap()));
    }

    fn edit_strategy() -> impl Strategy<Value = Edit> {
        let code = (0..catalog().len()).prop_map(|i| catalog()[i].currency());
        prop_oneof![
            "[0-9]{0,3}\\.?[0-9]{0,2}".prop_map(Edit::SetAmount),
            code.clone().prop_map(Edit::SetBaseCurrency),
            (0usize..4, code).prop_map(|(index, code)| Edit::SetQuoteCurrency { index, code }),
            Just(Edit::AddQuoteCurrency),
            (0usize..4).prop_map(Edit::RemoveQuoteCurrency),
            Just(Edit::SwapBaseWithPrimaryQuote),
        ]
    }

    proptest! {
        #[test]
        fn prop_edits_preserve_invariants(edits in prop::collection::vec(edit_strategy(), 1..40)) {
            let mut state = ConversionState::default();
            for edit in &edits {
                match state.apply(edit) {
                    Ok(next) => state = next,
                    Err(_) => {
                        // Rejection leaves the state as it was.
                        continue;
                    }
                }

                let quotes = state.quote_currencies();
                prop_assert!(!quotes.is_empty() && quotes.len() <= MAX_QUOTE_CURRENCIES);
                prop_assert!(!quotes.contains(state.base_currency()));
                let mut unique = quotes.clone();
                unique.sort();
                unique.dedup();
                prop_assert_eq!(unique.len(), quotes.len());
                prop_assert_eq!(state.rates().len(), quotes.len());
                prop_assert_eq!(state.converted_amounts().len(), quotes.len());
            }
        }

        #[test]
        fn prop_invalid_edits_rejected_in_any_state(
            edits in prop::collection::vec(edit_strategy(), 0..30),
            slot in 0usize..MAX_QUOTE_CURRENCIES,
        ) {
            let mut state = ConversionState::default();
            for edit in &edits {
                if let Ok(next) = state.apply(edit) {
                    state = next;
                }
            }
            let before = state.clone();
            let len = state.slots().len();
            let index = slot % len;

            let mut invalid = vec![
                (
                    Edit::SetQuoteCurrency { index, code: state.base_currency().clone() },
                    EditError::QuoteIsBase(state.base_currency().clone()),
                ),
                (
                    Edit::SetQuoteCurrency { index: len, code: state.base_currency().clone() },
                    EditError::SlotOutOfRange { index: len, len },
                ),
                (
                    Edit::SetAmount("1.2.3".to_string()),
                    EditError::InvalidAmount("1.2.3".to_string()),
                ),
                (
                    Edit::SetAmount("1e5".to_string()),
                    EditError::InvalidAmount("1e5".to_string()),
                ),
                (
                    Edit::SetAmount("100000000000000000000000000000".to_string()),
                    EditError::AmountOutOfRange("100000000000000000000000000000".to_string()),
                ),
                (
                    Edit::SetBaseCurrency(Currency::new("XYZ")),
                    EditError::UnknownCurrency("XYZ".to_string()),
                ),
            ];
            if len >= 2 {
                let other = state.slots()[(index + 1) % len].currency.clone();
                invalid.push((
                    Edit::SetQuoteCurrency { index, code: other.clone() },
                    EditError::DuplicateQuote(other),
                ));
            }
            if len >= 2 {
                invalid.push((
                    Edit::RemoveQuoteCurrency(len),
                    EditError::SlotOutOfRange { index: len, len },
                ));
            }

            for (edit, expected) in &invalid {
                prop_assert_eq!(state.apply(edit), Err(expected.clone()));
                prop_assert_eq!(&state, &before);
            }
        }
    }
}
