//! Globex Conversion Coordinator
//!
//! Owns the user-editable conversion state (amount, base currency, one to
//! three quote currencies), debounces amount edits, and drives two
//! independent fetch tracks: exchange rates and pair insight.

pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod edit;
pub mod metrics;
pub mod snapshot;
pub mod state;

pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, CoordinatorError, CoordinatorHandle};
pub use debounce::Debouncer;
pub use edit::{Edit, EditError, EditResult, Notice, NoticeLevel};
pub use metrics::{CoordinatorMetrics, MetricsSnapshot};
pub use snapshot::{Snapshot, TrackStatus};
pub use state::{ConversionState, QuoteSlot, MAX_QUOTE_CURRENCIES};
