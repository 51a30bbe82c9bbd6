//! Published view of the coordinator.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::state::ConversionState;

/// Progress of one fetch track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackStatus {
    /// Nothing dispatched for the current inputs.
    Idle,
    /// Request in flight.
    Pending,
    /// Latest request succeeded.
    Ready,
    /// Latest rate request failed.
    Failed,
    /// Latest insight request failed and the fallback insight is shown.
    Fallback,
}

impl TrackStatus {
    /// Check if a request is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, TrackStatus::Pending)
    }
}

/// State plus the status of both fetch tracks, published after each transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Conversion state.
    pub state: ConversionState,
    /// Amount the current rate track was computed for.
    pub settled_amount: Decimal,
    /// Rate track.
    pub rates: TrackStatus,
    /// Insight track.
    pub insight: TrackStatus,
}

impl Snapshot {
    /// Check if neither track has a request in flight.
    pub fn is_quiescent(&self) -> bool {
        !self.rates.is_pending() && !self.insight.is_pending()
    }

    /// Check if the typed amount has been settled by the debounce.
    pub fn amount_settled(&self) -> bool {
        self.state.amount() == self.settled_amount
    }
}
