//! Globex terminal converter.
//!
//! Reads line commands from stdin and prints the conversion view whenever
//! the coordinator publishes a change.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod command;
mod render;

use command::Command;
use globex_common::Currency;
use globex_coordinator::{
    config::parse_currency_list, ConversionState, Coordinator, CoordinatorConfig, CoordinatorError,
};
use globex_fx::{ExchangeRateApiProvider, RateClientConfig};
use globex_insight::{GeminiInsightProvider, InsightConfig};

/// Globex currency converter
#[derive(Parser, Debug)]
#[command(name = "globex")]
#[command(about = "Interactive currency converter with live rates and pair insights")]
struct Args {
    /// Initial amount
    #[arg(long)]
    amount: Option<String>,

    /// Initial base currency code
    #[arg(short, long)]
    base: Option<String>,

    /// Initial quote currency codes, comma separated (1-3)
    #[arg(short, long)]
    quotes: Option<String>,

    /// Quiet period in milliseconds before an amount edit fetches rates
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Generation model used for insights
    #[arg(long)]
    model: Option<String>,

    /// Request timeout in seconds for both services
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never interleave with the view on stdout.
    let filter = EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            args.log_json
                .then(|| fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with((!args.log_json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    let coordinator_config = coordinator_config(&args)?;
    coordinator_config
        .validate()
        .map_err(anyhow::Error::msg)?;

    let mut rate_config = RateClientConfig::from_env();
    let mut insight_config = InsightConfig::from_env();
    if let Some(secs) = args.timeout_secs {
        rate_config.request_timeout = Some(Duration::from_secs(secs));
        insight_config.request_timeout = Some(Duration::from_secs(secs));
    }
    if let Some(model) = &args.model {
        insight_config = insight_config.with_model(model.clone());
    }

    let rates = ExchangeRateApiProvider::new(rate_config).context("rate client")?;
    let insights = GeminiInsightProvider::new(insight_config).context("insight client")?;

    info!("Starting Globex");
    let handle = Coordinator::spawn(coordinator_config, Arc::new(rates), Arc::new(insights));
    let mut notices = handle.notices();
    let mut snapshots = handle.subscribe();

    println!("Globex currency converter. Type 'help' for commands.");
    let mut last_view = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };

                match command::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => println!("{}", render::HELP),
                    Ok(Some(Command::Currencies)) => println!("{}", render::render_currencies()),
                    Ok(Some(Command::Show)) => {
                        last_view = render::render_snapshot(&handle.snapshot());
                        println!("{last_view}");
                    }
                    Ok(Some(command)) => {
                        if let Some(edit) = command.into_edit() {
                            match handle.apply(edit).await {
                                // Rejections arrive as notices.
                                Ok(_) | Err(CoordinatorError::Rejected(_)) => {}
                                Err(err) => return Err(err.into()),
                            }
                        }
                    }
                    Err(err) => println!("[error] {err:#}"),
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = render::render_snapshot(&snapshots.borrow_and_update());
                if view != last_view {
                    println!("{view}");
                    last_view = view;
                }
            }
            notice = notices.recv() => match notice {
                Ok(notice) => println!("{}", render::render_notice(&notice)),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Dropped notices"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    if let Err(err) = handle.shutdown().await {
        warn!(error = %err, "Coordinator already stopped");
    }

    Ok(())
}

/// Environment configuration with command-line overrides applied.
fn coordinator_config(args: &Args) -> anyhow::Result<CoordinatorConfig> {
    let mut config = CoordinatorConfig::from_env();

    if let Some(ms) = args.debounce_ms {
        config = config.with_debounce(Duration::from_millis(ms));
    }

    if args.amount.is_some() || args.base.is_some() || args.quotes.is_some() {
        let current = &config.initial_state;
        let amount = args
            .amount
            .clone()
            .unwrap_or_else(|| current.amount_text().to_string());
        let base = args
            .base
            .as_deref()
            .map(Currency::new)
            .unwrap_or_else(|| current.base_currency().clone());
        let quotes = args
            .quotes
            .as_deref()
            .map(parse_currency_list)
            .unwrap_or_else(|| current.quote_currencies());

        let state = ConversionState::new(&amount, &base, &quotes)
            .context("invalid initial selection")?;
        config = config.with_initial_state(state);
    }

    Ok(config)
}
