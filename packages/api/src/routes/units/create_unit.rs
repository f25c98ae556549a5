use crate::{
    entity::{sea_orm_active_enums::UnitSize, unit},
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    routes::JsonBody,
    state::AppState,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectionTrait, SqlErr};
use serde::Deserialize;

use super::{validate_floor, validate_price};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitRequest {
    pub id: String,
    pub size: UnitSize,
    /// Decimal currency on the wire, cents once parsed
    #[serde(with = "crate::money")]
    pub price_per_month: i64,
    pub floor: Option<i32>,
    pub notes: Option<String>,
}

/// POST /units - New units start out vacant
#[tracing::instrument(name = "POST /units", skip(state, user, body))]
pub async fn create_unit(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    JsonBody(body): JsonBody<CreateUnitRequest>,
) -> Result<(StatusCode, Json<unit::Model>), ApiError> {
    user.authorize(RolePermissions::WriteUnits)?;

    let id = body.id.trim().to_string();
    if id.is_empty() || id.chars().count() > 10 {
        return Err(ApiError::validation(
            "Unit id must be between 1 and 10 characters",
        ));
    }
    validate_price(body.price_per_month)?;
    validate_floor(body.floor)?;

    let now = Utc::now().naive_utc();
    let created = insert_unit(
        &state.db,
        unit::ActiveModel {
            id: Set(id),
            size: Set(body.size),
            price_per_month: Set(body.price_per_month),
            is_occupied: Set(false),
            customer_id: Set(None),
            rented_since: Set(None),
            floor: Set(body.floor),
            notes: Set(body.notes),
            created_at: Set(now),
            updated_at: Set(now),
        },
    )
    .await?;

    tracing::info!(unit_id = %created.id, "Unit created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Inserts a new unit. A primary key that is already taken answers 400.
pub(crate) async fn insert_unit<C: ConnectionTrait>(
    db: &C,
    model: unit::ActiveModel,
) -> Result<unit::Model, ApiError> {
    let id = model.id.clone().take().unwrap_or_default();
    match model.insert(db).await {
        Ok(created) => Ok(created),
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
            ApiError::bad_request(format!("Unit with ID {id} already exists")),
        ),
        Err(err) => Err(err.into()),
    }
}
