use crate::{
    error::ApiError, middleware::jwt::AppUser, permission::RolePermissions, state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};

use super::{UnitResponse, find_unit, with_customers};

/// GET /units/{unit_id}
#[tracing::instrument(name = "GET /units/{unit_id}", skip(state, user))]
pub async fn get_unit(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(unit_id): Path<String>,
) -> Result<Json<UnitResponse>, ApiError> {
    user.authorize(RolePermissions::ReadUnits)?;

    let unit = find_unit(&state.db, &unit_id).await?;
    with_customers(&state.db, vec![unit])
        .await?
        .pop()
        .map(Json)
        .ok_or(ApiError::NOT_FOUND)
}
