#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use axum::{Router, middleware::from_fn, routing::get};
use std::{sync::Arc, time::Duration};
use storage_metrics_api::{
    aggregation::compute_current_snapshot, construct_router, entity::create_tables,
    state::{AppState, State},
};

mod config;
mod metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    metrics::init_telemetry()?;

    tracing::info!("Starting storage metrics API service");

    let config = config::Config::from_env()?;
    tracing::info!(
        port = config.port,
        max_connections = config.api.database.max_connections,
        scheduled = config.metrics_interval.is_some(),
        "Loaded configuration"
    );

    let auto_migrate = config.api.database.auto_migrate;
    let state: AppState = Arc::new(State::new(config.api.clone()).await?);

    if auto_migrate {
        create_tables(&state.db).await?;
        tracing::info!("Database tables ensured");
    }

    if let Some(period) = config.metrics_interval {
        tokio::spawn(run_scheduled_aggregation(state.clone(), period));
    }

    let app = Router::new()
        .route("/metrics/prometheus", get(metrics::handler))
        .merge(construct_router(state))
        .layer(from_fn(metrics::track_http));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Recomputes the current month every `period`. Failed runs are logged and the
/// next tick runs as usual.
async fn run_scheduled_aggregation(state: AppState, period: Duration) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match compute_current_snapshot(&state.db).await {
            Ok(snapshot) => tracing::info!(
                month = %snapshot.metric.month,
                created = snapshot.created,
                "Scheduled snapshot calculated"
            ),
            Err(err) => tracing::error!(error = %err, "Scheduled snapshot failed"),
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
