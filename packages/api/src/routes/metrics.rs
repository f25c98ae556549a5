use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::aggregation::analytics::DEFAULT_TREND_MONTHS;

pub mod calculate;
pub mod dashboard;
pub mod get_metric;
pub mod list_metrics;
pub mod occupancy;
pub mod revenue;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_metrics::list_metrics))
        .route("/calculate", post(calculate::calculate))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/revenue", get(revenue::revenue))
        .route("/occupancy", get(occupancy::occupancy))
        .route("/{month}", get(get_metric::get_metric))
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub months: Option<String>,
}

impl TrendQuery {
    /// Number of snapshots to include, 12 unless a positive number is given.
    pub fn months(&self) -> u64 {
        self.months
            .as_deref()
            .and_then(|m| m.trim().parse::<u64>().ok())
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_TREND_MONTHS)
    }
}
