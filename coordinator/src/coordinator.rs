//! Conversion coordinator.
//!
//! A single task owns the [`ConversionState`]. Edits arrive as commands from a
//! [`CoordinatorHandle`]; fetch results and settled amounts arrive as internal
//! events. Rate and insight fetches run as independent tasks and report back
//! with the generation they were dispatched under, so only the result of the
//! latest request on each track is ever applied.

use std::sync::Arc;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, error, info, instrument, warn};

use globex_common::{parse_amount, Currency};
use globex_fx::{FxResult, RateProvider, RateTable};
use globex_insight::{Insight, InsightProvider, InsightRequest, InsightResult};

use crate::config::CoordinatorConfig;
use crate::debounce::Debouncer;
use crate::edit::{Edit, EditError, Notice};
use crate::metrics::{CoordinatorMetrics, MetricsSnapshot};
use crate::snapshot::{Snapshot, TrackStatus};
use crate::state::ConversionState;

/// Failures seen by handle callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    /// Edit rejected; state unchanged.
    #[error(transparent)]
    Rejected(#[from] EditError),

    /// Coordinator task is no longer running.
    #[error("Coordinator stopped")]
    Stopped,
}

impl CoordinatorError {
    /// Get error code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            CoordinatorError::Rejected(err) => err.error_code(),
            CoordinatorError::Stopped => "COORDINATOR_STOPPED",
        }
    }
}

enum Command {
    Apply {
        edit: Edit,
        reply: oneshot::Sender<Result<Snapshot, EditError>>,
    },
    Shutdown {
        done: oneshot::Sender<()>,
    },
}

enum Event {
    AmountSettled(String),
    RatesDone {
        generation: u64,
        amount: Decimal,
        result: FxResult<RateTable>,
    },
    InsightDone {
        generation: u64,
        result: InsightResult<Insight>,
    },
}

/// Cloneable handle to a running coordinator.
#[derive(Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
    notices: broadcast::Sender<Notice>,
    first_notices: Arc<Mutex<Option<broadcast::Receiver<Notice>>>>,
    metrics: Arc<CoordinatorMetrics>,
}

impl CoordinatorHandle {
    /// Apply an edit and return the snapshot published for it.
    pub async fn apply(&self, edit: Edit) -> Result<Snapshot, CoordinatorError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Apply { edit, reply })
            .await
            .map_err(|_| CoordinatorError::Stopped)?;

        Ok(response.await.map_err(|_| CoordinatorError::Stopped)??)
    }

    pub async fn set_amount(&self, text: impl Into<String>) -> Result<Snapshot, CoordinatorError> {
        self.apply(Edit::SetAmount(text.into())).await
    }

    pub async fn set_base_currency(&self, code: Currency) -> Result<Snapshot, CoordinatorError> {
        self.apply(Edit::SetBaseCurrency(code)).await
    }

    pub async fn set_quote_currency(
        &self,
        index: usize,
        code: Currency,
    ) -> Result<Snapshot, CoordinatorError> {
        self.apply(Edit::SetQuoteCurrency { index, code }).await
    }

    pub async fn add_quote_currency(&self) -> Result<Snapshot, CoordinatorError> {
        self.apply(Edit::AddQuoteCurrency).await
    }

    pub async fn remove_quote_currency(&self, index: usize) -> Result<Snapshot, CoordinatorError> {
        self.apply(Edit::RemoveQuoteCurrency(index)).await
    }

    pub async fn swap_base_with_primary_quote(&self) -> Result<Snapshot, CoordinatorError> {
        self.apply(Edit::SwapBaseWithPrimaryQuote).await
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Receiver for user-facing notices.
    ///
    /// The first call also sees notices raised before it; later calls only
    /// see notices raised after subscribing.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.first_notices
            .lock()
            .take()
            .unwrap_or_else(|| self.notices.subscribe())
    }

    /// Current counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Stop the coordinator and wait for its task to finish.
    pub async fn shutdown(&self) -> Result<(), CoordinatorError> {
        let (done, finished) = oneshot::channel();
        self.commands
            .send(Command::Shutdown { done })
            .await
            .map_err(|_| CoordinatorError::Stopped)?;
        finished.await.map_err(|_| CoordinatorError::Stopped)
    }
}

/// Owner of the conversion state.
pub struct Coordinator {
    state: ConversionState,
    settled_amount: Decimal,
    rate_status: TrackStatus,
    insight_status: TrackStatus,
    rate_generation: u64,
    insight_generation: u64,
    rates: Arc<dyn RateProvider>,
    insights: Arc<dyn InsightProvider>,
    debouncer: Debouncer,
    events: mpsc::UnboundedSender<Event>,
    snapshots: watch::Sender<Snapshot>,
    notices: broadcast::Sender<Notice>,
    metrics: Arc<CoordinatorMetrics>,
}

impl Coordinator {
    /// Start a coordinator task and fetch rates and insight for the initial state.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        config: CoordinatorConfig,
        rates: Arc<dyn RateProvider>,
        insights: Arc<dyn InsightProvider>,
    ) -> CoordinatorHandle {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (notice_tx, first_notices) = broadcast::channel(config.notice_capacity.max(1));

        let state = config.initial_state;
        let settled_amount = state.amount();
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot {
            state: state.clone(),
            settled_amount,
            rates: TrackStatus::Idle,
            insight: TrackStatus::Idle,
        });

        let metrics = Arc::new(CoordinatorMetrics::new());

        info!(
            rate_provider = rates.name(),
            insight_provider = insights.name(),
            debounce_ms = config.debounce.as_millis() as u64,
            "Starting coordinator"
        );

        let coordinator = Coordinator {
            state,
            settled_amount,
            rate_status: TrackStatus::Idle,
            insight_status: TrackStatus::Idle,
            rate_generation: 0,
            insight_generation: 0,
            rates,
            insights,
            debouncer: Debouncer::new(config.debounce),
            events: event_tx,
            snapshots: snapshot_tx,
            notices: notice_tx.clone(),
            metrics: metrics.clone(),
        };
        tokio::spawn(coordinator.run(command_rx, event_rx));

        CoordinatorHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            notices: notice_tx,
            first_notices: Arc::new(Mutex::new(Some(first_notices))),
            metrics,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        self.refresh_rates();
        self.refresh_insight();
        self.publish();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Apply { edit, reply }) => {
                        let result = self.handle_edit(edit);
                        let _ = reply.send(result);
                    }
                    Some(Command::Shutdown { done }) => {
                        self.debouncer.cancel();
                        info!("Coordinator stopped");
                        let _ = done.send(());
                        return;
                    }
                    None => break,
                },
                Some(event) = events.recv() => self.handle_event(event),
            }
        }

        self.debouncer.cancel();
        info!("Coordinator stopped: all handles dropped");
    }

    #[instrument(skip(self), fields(base = %self.state.base_currency()))]
    fn handle_edit(&mut self, edit: Edit) -> Result<Snapshot, EditError> {
        let next = match self.state.apply(&edit) {
            Ok(next) => next,
            Err(err) => {
                self.metrics.edit_rejected();
                debug!(error_code = err.error_code(), error = %err, "Edit rejected");
                self.notify(Notice::from(&err));
                return Err(err);
            }
        };

        let amount_changed = next.amount_text() != self.state.amount_text();
        let selection_changed = !next.same_selection(&self.state);
        self.state = next;

        if selection_changed {
            self.refresh_rates();
            self.refresh_insight();
        }
        if amount_changed {
            let text = self.state.amount_text().to_string();
            self.debouncer.schedule(&self.events, Event::AmountSettled(text));
        }

        self.publish();
        Ok(self.current_snapshot())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::AmountSettled(text) => self.on_amount_settled(text),
            Event::RatesDone {
                generation,
                amount,
                result,
            } => self.on_rates(generation, amount, result),
            Event::InsightDone { generation, result } => self.on_insight(generation, result),
        }
    }

    fn on_amount_settled(&mut self, text: String) {
        // A newer edit was made after this delivery left the debouncer.
        if text != self.state.amount_text() {
            return;
        }

        let amount = parse_amount(&text);
        if amount == self.settled_amount {
            debug!(%amount, "Settled amount unchanged");
            return;
        }

        self.settled_amount = amount;
        self.refresh_rates();
        self.publish();
    }

    fn refresh_rates(&mut self) {
        self.rate_generation += 1;
        let generation = self.rate_generation;
        let amount = self.settled_amount;

        if amount <= Decimal::ZERO || self.state.slots().is_empty() {
            self.state.apply_zero_amount();
            self.rate_status = TrackStatus::Idle;
            debug!(generation, "Amount is zero, skipping rate fetch");
            return;
        }

        self.rate_status = TrackStatus::Pending;
        self.metrics.rate_fetch_dispatched();

        let provider = self.rates.clone();
        let base = self.state.base_currency().clone();
        let events = self.events.clone();
        debug!(generation, %base, %amount, "Dispatching rate fetch");

        tokio::spawn(async move {
            let result = provider.get_rates(&base).await;
            let _ = events.send(Event::RatesDone {
                generation,
                amount,
                result,
            });
        });
    }

    fn refresh_insight(&mut self) {
        self.insight_generation += 1;
        let generation = self.insight_generation;

        let request = match InsightRequest::new(
            self.state.base_currency().clone(),
            self.state.quote_currencies(),
        ) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "Cannot request insight");
                self.metrics.insight_fallback();
                self.state.set_insight(Some(Insight::fallback()));
                self.insight_status = TrackStatus::Fallback;
                return;
            }
        };

        self.insight_status = TrackStatus::Pending;
        self.metrics.insight_fetch_dispatched();

        let provider = self.insights.clone();
        let events = self.events.clone();
        debug!(generation, pair = %request.primary_pair(), "Dispatching insight fetch");

        tokio::spawn(async move {
            let result = provider.get_insight(&request).await;
            let _ = events.send(Event::InsightDone { generation, result });
        });
    }

    fn on_rates(&mut self, generation: u64, amount: Decimal, result: FxResult<RateTable>) {
        if generation != self.rate_generation {
            self.metrics.stale_result_discarded();
            debug!(generation, latest = self.rate_generation, "Discarding stale rates");
            return;
        }

        match result {
            Ok(table) => {
                self.state.apply_rates(amount, &table);
                self.rate_status = TrackStatus::Ready;
                self.metrics.rate_fetch_succeeded();
                info!(base = %table.base, rates = table.len(), "Rates applied");
            }
            Err(err) => {
                self.state.clear_rates();
                self.rate_status = TrackStatus::Failed;
                self.metrics.rate_fetch_failed();
                error!(error_code = err.error_code(), error = %err, "Rate fetch failed");
                self.notify(Notice::error("Conversion Error", err.to_string()));
            }
        }

        self.publish();
    }

    fn on_insight(&mut self, generation: u64, result: InsightResult<Insight>) {
        if generation != self.insight_generation {
            self.metrics.stale_result_discarded();
            debug!(generation, latest = self.insight_generation, "Discarding stale insight");
            return;
        }

        match result {
            Ok(insight) => {
                self.state.set_insight(Some(insight));
                self.insight_status = TrackStatus::Ready;
            }
            Err(err) => {
                warn!(error_code = err.error_code(), error = %err, "Insight fetch failed, using fallback");
                self.state.set_insight(Some(Insight::fallback()));
                self.insight_status = TrackStatus::Fallback;
                self.metrics.insight_fallback();
            }
        }

        self.publish();
    }

    fn notify(&self, notice: Notice) {
        // No subscribers is fine.
        let _ = self.notices.send(notice);
    }

    fn current_snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            settled_amount: self.settled_amount,
            rates: self.rate_status,
            insight: self.insight_status,
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.current_snapshot());
    }
}
