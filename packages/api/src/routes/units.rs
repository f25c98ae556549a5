use std::collections::HashMap;

use crate::{
    entity::{customer, sea_orm_active_enums::CustomerType, unit},
    error::ApiError,
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Serialize;

pub mod create_unit;
pub mod delete_unit;
pub mod get_unit;
pub mod list_units;
pub mod release_unit;
pub mod rent_unit;
pub mod unit_stats;
pub mod update_unit;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_units::list_units).post(create_unit::create_unit),
        )
        .route("/stats", get(unit_stats::unit_stats))
        .route(
            "/{unit_id}",
            get(get_unit::get_unit)
                .put(update_unit::update_unit)
                .delete(delete_unit::delete_unit),
        )
        .route("/{unit_id}/rent", post(rent_unit::rent_unit))
        .route("/{unit_id}/release", post(release_unit::release_unit))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitCustomer {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub start_date: NaiveDate,
}

impl From<customer::Model> for UnitCustomer {
    fn from(c: customer::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            customer_type: c.customer_type,
            email: c.email,
            phone: c.phone,
            start_date: c.start_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitResponse {
    #[serde(flatten)]
    pub unit: unit::Model,
    pub customer: Option<UnitCustomer>,
}

/// Attaches the renting customer to each unit.
pub(crate) async fn with_customers<C: ConnectionTrait>(
    db: &C,
    units: Vec<unit::Model>,
) -> Result<Vec<UnitResponse>, ApiError> {
    let customer_ids: Vec<_> = units.iter().filter_map(|u| u.customer_id.clone()).collect();
    let customers = if !customer_ids.is_empty() {
        customer::Entity::find()
            .filter(customer::Column::Id.is_in(customer_ids))
            .all(db)
            .await?
    } else {
        vec![]
    };

    let customer_map: HashMap<_, _> = customers
        .into_iter()
        .map(|c| (c.id.clone(), UnitCustomer::from(c)))
        .collect();

    Ok(units
        .into_iter()
        .map(|unit| {
            let customer = unit
                .customer_id
                .as_ref()
                .and_then(|id| customer_map.get(id).cloned());
            UnitResponse { unit, customer }
        })
        .collect())
}

pub(crate) async fn find_unit<C: ConnectionTrait>(
    db: &C,
    unit_id: &str,
) -> Result<unit::Model, ApiError> {
    unit::Entity::find_by_id(unit_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Unit {unit_id} not found")))
}

pub(crate) fn validate_price(price: i64) -> Result<(), ApiError> {
    if price < 0 {
        return Err(ApiError::validation("Price per month must not be negative"));
    }
    Ok(())
}

pub(crate) fn validate_floor(floor: Option<i32>) -> Result<(), ApiError> {
    if floor.is_some_and(|f| f < 0) {
        return Err(ApiError::validation("Floor must not be negative"));
    }
    Ok(())
}
