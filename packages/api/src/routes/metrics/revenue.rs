use crate::{
    aggregation::analytics::{RevenueAnalytics, load_revenue_analytics},
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    routes::QueryParams,
    state::AppState,
};
use axum::{Extension, Json, extract::State};

use super::TrendQuery;

/// GET /metrics/revenue
#[tracing::instrument(name = "GET /metrics/revenue", skip(state, user))]
pub async fn revenue(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    QueryParams(query): QueryParams<TrendQuery>,
) -> Result<Json<RevenueAnalytics>, ApiError> {
    user.authorize(RolePermissions::ReadMetrics)?;
    Ok(Json(
        load_revenue_analytics(&state.db, query.months()).await?,
    ))
}
