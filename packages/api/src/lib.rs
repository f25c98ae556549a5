use axum::{
    Json, Router,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use middleware::{error_reporting::error_reporting_middleware, jwt::jwt_middleware};
use serde::Serialize;
use state::AppState;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, decompression::RequestDecompressionLayer,
    trace::TraceLayer,
};

pub mod entity;
mod middleware;
mod routes;

pub mod aggregation;
pub mod auth_jwt;
pub mod config;
pub mod error;
pub mod money;
pub mod pagination;
pub mod permission;
pub mod state;
pub mod user_management;

pub use axum;
pub mod auth {
    use crate::middleware;
    pub use middleware::jwt::{AppUser, AuthenticatedUser};
}

pub use sea_orm;

pub fn construct_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(service_info))
        .nest("/health", routes::health::routes())
        .nest("/auth", routes::auth::routes())
        .nest("/units", routes::units::routes())
        .nest("/customers", routes::customers::routes())
        .nest("/metrics", routes::metrics::routes())
        .with_state(state.clone())
        .layer(from_fn(error_reporting_middleware))
        .layer(from_fn_with_state(state.clone(), jwt_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new()),
        );

    Router::new().nest("/api/v1", router)
}

#[derive(Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
}

#[tracing::instrument(name = "GET /")]
async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
