use crate::{
    entity::{customer, unit},
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
use chrono::{NaiveDateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, sea_query::Expr};
use serde::Deserialize;

use super::find_unit;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentUnitRequest {
    pub customer_id: String,
}

/// POST /units/{unit_id}/rent
#[tracing::instrument(name = "POST /units/{unit_id}/rent", skip(state, user, body))]
pub async fn rent_unit(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(unit_id): Path<String>,
    JsonBody(body): JsonBody<RentUnitRequest>,
) -> Result<Json<unit::Model>, ApiError> {
    user.authorize(RolePermissions::RentUnits)?;

    let unit = find_unit(&state.db, &unit_id).await?;
    if unit.is_occupied {
        return Err(ApiError::bad_request("Unit is already occupied"));
    }

    let now = Utc::now().naive_utc();
    let customer = customer::Entity::find_by_id(body.customer_id.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Customer {} not found", body.customer_id)))?;
    if !customer.is_active_on(now.date()) {
        return Err(ApiError::bad_request("Customer is no longer active"));
    }

    if !claim_unit(&state.db, &unit.id, &customer.id, now).await? {
        return Err(ApiError::bad_request("Unit is already occupied"));
    }
    let rented = find_unit(&state.db, &unit.id).await?;

    tracing::info!(unit_id = %rented.id, customer_id = %customer.id, "Unit rented");
    Ok(Json(rented))
}

/// Marks a vacant unit as rented by `customer_id`.
/// Returns `false` when the unit was already occupied at write time.
pub(crate) async fn claim_unit<C: ConnectionTrait>(
    db: &C,
    unit_id: &str,
    customer_id: &str,
    now: NaiveDateTime,
) -> Result<bool, DbErr> {
    let result = unit::Entity::update_many()
        .col_expr(unit::Column::IsOccupied, Expr::value(true))
        .col_expr(unit::Column::CustomerId, Expr::value(customer_id))
        .col_expr(unit::Column::RentedSince, Expr::value(now.date()))
        .col_expr(unit::Column::UpdatedAt, Expr::value(now))
        .filter(unit::Column::Id.eq(unit_id))
        .filter(unit::Column::IsOccupied.eq(false))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}
