use crate::{
    aggregation::analytics::{OccupancyAnalytics, load_occupancy_analytics},
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    routes::QueryParams,
    state::AppState,
};
use axum::{Extension, Json, extract::State};

use super::TrendQuery;

/// GET /metrics/occupancy
#[tracing::instrument(name = "GET /metrics/occupancy", skip(state, user))]
pub async fn occupancy(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    QueryParams(query): QueryParams<TrendQuery>,
) -> Result<Json<OccupancyAnalytics>, ApiError> {
    user.authorize(RolePermissions::ReadMetrics)?;
    Ok(Json(
        load_occupancy_analytics(&state.db, query.months()).await?,
    ))
}
