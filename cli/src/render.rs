//! Text rendering of coordinator snapshots and notices.

use std::fmt::Write;

use globex_common::{catalog, lookup, region_code, Currency};
use globex_coordinator::{Notice, NoticeLevel, Snapshot};

pub const HELP: &str = "\
Commands:
  amount <value>       set the amount to convert (digits and one '.')
  base <CODE>          select the base currency
  quote <n> <CODE>     replace quote currency n (1-3)
  add                  add a quote currency
  remove <n>           remove quote currency n
  swap                 swap the base with the first quote currency
  show                 print the current conversion
  currencies           list supported currencies
  help                 show this help
  quit                 exit";

fn display_name(currency: &Currency) -> &'static str {
    lookup(currency.code())
        .map(|info| info.display_name)
        .unwrap_or("")
}

/// Render the full conversion view.
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let state = &snapshot.state;
    let base = state.base_currency();
    let mut out = String::new();

    let _ = writeln!(out, "Amount: {}", state.amount_text());
    let _ = writeln!(out, "Base:   {} ({})", base, display_name(base));
    let _ = writeln!(out);

    for (number, slot) in state.slots().iter().enumerate() {
        let converted = slot
            .converted
            .map(|value| format!("{:.2}", value))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {}. [{}] {} {}",
            number + 1,
            region_code(&slot.currency),
            slot.currency,
            converted
        );
    }
    let _ = writeln!(out);

    let rate_lines: Vec<String> = state
        .slots()
        .iter()
        .filter_map(|slot| {
            slot.rate
                .map(|rate| format!("  1 {} = {:.4} {}", base, rate, slot.currency))
        })
        .collect();
    if rate_lines.is_empty() {
        let _ = writeln!(out, "Enter an amount to see exchange rates.");
    } else {
        let _ = writeln!(out, "Rates:");
        for line in rate_lines {
            let _ = writeln!(out, "{line}");
        }
    }

    if snapshot.insight.is_pending() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Insights:");
        let _ = writeln!(out, "  Fetching latest analysis...");
    } else if let Some(insight) = state.insight() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Insights:");
        let _ = writeln!(out, "  {}", insight.text);
        let _ = writeln!(out, "  {}", insight.disclaimer);
    }

    out
}

/// Render a transient notice.
pub fn render_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Error => format!("[error] {}: {}", notice.title, notice.message),
        NoticeLevel::Info => format!("[info] {}", notice.message),
    }
}

/// Render the currency catalog.
pub fn render_currencies() -> String {
    catalog()
        .iter()
        .map(|info| format!("  {}  {} ({})", info.code, info.display_name, info.region_code))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use globex_coordinator::{ConversionState, EditError, TrackStatus};
    use globex_fx::RateTable;
    use globex_insight::Insight;
    use rust_decimal_macros::dec;

    fn snapshot(state: ConversionState) -> Snapshot {
        Snapshot {
            settled_amount: state.amount(),
            state,
            rates: TrackStatus::Ready,
            insight: TrackStatus::Idle,
        }
    }

    fn usd_eur_jpy() -> ConversionState {
        ConversionState::new("2.50", &Currency::usd(), &[Currency::eur(), Currency::jpy()]).unwrap()
    }

    #[test]
    fn test_render_converted_and_rates() {
        let mut state = usd_eur_jpy();
        state.apply_rates(
            dec!(2.50),
            &RateTable::new(Currency::usd()).with_rate("EUR", dec!(0.9)),
        );

        let text = render_snapshot(&snapshot(state));

        assert!(text.contains("Base:   USD (United States Dollar)"));
        assert!(text.contains("  1. [EU] EUR 2.25\n"));
        assert!(text.contains("  2. [JP] JPY -\n"));
        assert!(text.contains("1 USD = 0.9000 EUR"));
        assert!(!text.contains("= 150"));
        assert!(!text.contains("Insights:"));
    }

    #[test]
    fn test_render_without_rates() {
        let mut state = usd_eur_jpy();
        state.apply_zero_amount();

        let text = render_snapshot(&snapshot(state));

        assert!(text.contains("1. [EU] EUR 0.00"));
        assert!(text.contains("Enter an amount to see exchange rates."));
    }

    #[test]
    fn test_render_insight_panel() {
        let mut pending = snapshot(usd_eur_jpy());
        pending.insight = TrackStatus::Pending;
        assert!(render_snapshot(&pending).contains("Fetching latest analysis..."));

        let mut state = usd_eur_jpy();
        state.set_insight(Some(Insight::new("Watch rate decisions.", "Not advice.")));
        let text = render_snapshot(&snapshot(state));
        assert!(text.contains("  Watch rate decisions.\n  Not advice."));
    }

    #[test]
    fn test_render_notice() {
        let notice = Notice::from(&EditError::QuoteIsBase(Currency::usd()));
        assert_eq!(
            render_notice(&notice),
            "[error] Selection Error: Cannot select the base currency USD as a quote currency."
        );

        let notice = Notice::from(&EditError::NoCurrencyAvailable);
        assert_eq!(render_notice(&notice), "[info] No more unique currencies to add.");
    }

    #[test]
    fn test_render_currencies() {
        let text = render_currencies();
        assert_eq!(text.lines().count(), 15);
        assert!(text.starts_with("  USD  United States Dollar (US)"));
    }
}
