use crate::{
    entity::unit, error::ApiError, middleware::jwt::AppUser, permission::RolePermissions,
    state::AppState,
};
use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;

use super::find_unit;

/// DELETE /units/{unit_id} - Occupied units must be released first
#[tracing::instrument(name = "DELETE /units/{unit_id}", skip(state, user))]
pub async fn delete_unit(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(unit_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    user.authorize(RolePermissions::DeleteUnits)?;

    let unit = find_unit(&state.db, &unit_id).await?;
    if unit.is_occupied {
        return Err(ApiError::bad_request(
            "Cannot delete an occupied unit. Release it first.",
        ));
    }

    unit::Entity::delete_by_id(unit.id).exec(&state.db).await?;
    tracing::info!(unit_id = %unit_id, "Unit deleted");
    Ok(StatusCode::NO_CONTENT)
}
