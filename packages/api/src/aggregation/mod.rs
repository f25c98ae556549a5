//! Monthly metric snapshots and the views built on top of them.

pub mod aggregator;
pub mod analytics;
pub mod dashboard;
pub mod error;
pub mod snapshot;

pub use aggregator::{CalculatedSnapshot, compute_current_snapshot, compute_snapshot_at};
pub use error::MetricsError;
