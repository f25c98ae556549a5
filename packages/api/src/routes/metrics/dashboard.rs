use crate::{
    aggregation::dashboard::{DashboardSummary, load_dashboard},
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    state::AppState,
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;

/// GET /metrics/dashboard
#[tracing::instrument(name = "GET /metrics/dashboard", skip(state, user))]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<Json<DashboardSummary>, ApiError> {
    user.authorize(RolePermissions::ReadMetrics)?;
    Ok(Json(
        load_dashboard(&state.db, Utc::now().date_naive()).await?,
    ))
}
