//! Globex Common Types
//!
//! Currency codes, the fixed currency catalog and amount-text handling shared
//! by the rate client, the insight client and the conversion coordinator.

pub mod catalog;
pub mod monetary;
pub mod amount;
pub mod error;

pub use catalog::*;
pub use monetary::*;
pub use amount::*;
pub use error::*;
