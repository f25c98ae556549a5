use crate::{
    aggregation::analytics::{CustomerStats, load_customer_stats},
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    state::AppState,
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;

/// GET /customers/stats
#[tracing::instrument(name = "GET /customers/stats", skip(state, user))]
pub async fn customer_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<Json<CustomerStats>, ApiError> {
    user.authorize(RolePermissions::ReadCustomers)?;
    Ok(Json(
        load_customer_stats(&state.db, Utc::now().date_naive()).await?,
    ))
}
