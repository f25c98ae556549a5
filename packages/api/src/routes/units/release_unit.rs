use crate::{
    entity::unit, error::ApiError, middleware::jwt::AppUser, permission::RolePermissions,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};

use super::find_unit;

/// POST /units/{unit_id}/release
#[tracing::instrument(name = "POST /units/{unit_id}/release", skip(state, user))]
pub async fn release_unit(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(unit_id): Path<String>,
) -> Result<Json<unit::Model>, ApiError> {
    user.authorize(RolePermissions::RentUnits)?;

    let unit = find_unit(&state.db, &unit_id).await?;
    if !unit.is_occupied {
        return Err(ApiError::bad_request("Unit is not occupied"));
    }

    let mut active: unit::ActiveModel = unit.into();
    active.is_occupied = Set(false);
    active.customer_id = Set(None);
    active.rented_since = Set(None);
    active.updated_at = Set(Utc::now().naive_utc());
    let released = active.update(&state.db).await?;

    tracing::info!(unit_id = %released.id, "Unit released");
    Ok(Json(released))
}
