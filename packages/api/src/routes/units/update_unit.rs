use crate::{
    entity::{sea_orm_active_enums::UnitSize, unit},
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    routes::JsonBody,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use serde::Deserialize;

use super::{find_unit, validate_floor, validate_price};

/// Occupancy is changed through rent/release only.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitRequest {
    pub size: Option<UnitSize>,
    #[serde(default, with = "crate::money::option")]
    pub price_per_month: Option<i64>,
    pub floor: Option<i32>,
    pub notes: Option<String>,
}

/// PUT /units/{unit_id}
#[tracing::instrument(name = "PUT /units/{unit_id}", skip(state, user, body))]
pub async fn update_unit(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(unit_id): Path<String>,
    JsonBody(body): JsonBody<UpdateUnitRequest>,
) -> Result<Json<unit::Model>, ApiError> {
    user.authorize(RolePermissions::WriteUnits)?;

    let existing = find_unit(&state.db, &unit_id).await?;
    let mut active: unit::ActiveModel = existing.into();

    if let Some(size) = body.size {
        active.size = Set(size);
    }
    if let Some(price) = body.price_per_month {
        validate_price(price)?;
        active.price_per_month = Set(price);
    }
    if body.floor.is_some() {
        validate_floor(body.floor)?;
        active.floor = Set(body.floor);
    }
    if let Some(notes) = body.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(Utc::now().naive_utc());

    Ok(Json(active.update(&state.db).await?))
}
