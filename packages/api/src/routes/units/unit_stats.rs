use crate::{
    aggregation::analytics::{UnitStats, load_unit_stats},
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    state::AppState,
};
use axum::{Extension, Json, extract::State};

/// GET /units/stats
#[tracing::instrument(name = "GET /units/stats", skip(state, user))]
pub async fn unit_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<Json<UnitStats>, ApiError> {
    user.authorize(RolePermissions::ReadUnits)?;
    Ok(Json(load_unit_stats(&state.db).await?))
}
