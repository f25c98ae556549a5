use std::collections::HashMap;

use crate::{
    entity::{customer, sea_orm_active_enums::UnitSize, unit},
    error::ApiError,
    state::AppState,
    user_management::validate_email,
};
use axum::{Router, routing::get};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

pub mod create_customer;
pub mod customer_stats;
pub mod delete_customer;
pub mod get_customer;
pub mod list_customers;
pub mod update_customer;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_customers::list_customers).post(create_customer::create_customer),
        )
        .route("/stats", get(customer_stats::customer_stats))
        .route(
            "/{customer_id}",
            get(get_customer::get_customer)
                .put(update_customer::update_customer)
                .delete(delete_customer::delete_customer),
        )
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUnit {
    pub id: String,
    pub size: UnitSize,
    #[serde(with = "crate::money")]
    pub price_per_month: i64,
    pub is_occupied: bool,
    pub rented_since: Option<NaiveDate>,
}

impl From<unit::Model> for CustomerUnit {
    fn from(u: unit::Model) -> Self {
        Self {
            id: u.id,
            size: u.size,
            price_per_month: u.price_per_month,
            is_occupied: u.is_occupied,
            rented_since: u.rented_since,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    #[serde(flatten)]
    pub customer: customer::Model,
    pub units: Vec<CustomerUnit>,
}

/// Attaches the rented units to each customer.
pub(crate) async fn with_units<C: ConnectionTrait>(
    db: &C,
    customers: Vec<customer::Model>,
) -> Result<Vec<CustomerResponse>, ApiError> {
    let ids: Vec<_> = customers.iter().map(|c| c.id.clone()).collect();
    let units = if !ids.is_empty() {
        unit::Entity::find()
            .filter(unit::Column::CustomerId.is_in(ids))
            .order_by_asc(unit::Column::Id)
            .all(db)
            .await?
    } else {
        vec![]
    };

    let mut unit_map: HashMap<String, Vec<CustomerUnit>> = HashMap::new();
    for unit in units {
        if let Some(customer_id) = unit.customer_id.clone() {
            unit_map
                .entry(customer_id)
                .or_default()
                .push(CustomerUnit::from(unit));
        }
    }

    Ok(customers
        .into_iter()
        .map(|customer| {
            let units = unit_map.remove(&customer.id).unwrap_or_default();
            CustomerResponse { customer, units }
        })
        .collect())
}

pub(crate) async fn find_customer<C: ConnectionTrait>(
    db: &C,
    customer_id: &str,
) -> Result<customer::Model, ApiError> {
    customer::Entity::find_by_id(customer_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Customer {customer_id} not found")))
}

/// Next id in the `C001`, `C002`, ... sequence. Ids that do not follow the
/// pattern are ignored; numbering continues past `C999` with more digits.
pub fn next_customer_id<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let next = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix('C'))
        .filter_map(|n| n.parse::<u64>().ok())
        .max()
        .map_or(1, |n| n + 1);
    format!("C{next:03}")
}

pub(crate) fn validate_name(name: &str) -> Result<(), ApiError> {
    let len = name.trim().chars().count();
    if !(2..=255).contains(&len) {
        return Err(ApiError::validation(
            "Name must be between 2 and 255 characters",
        ));
    }
    Ok(())
}

pub(crate) fn validate_optional_email(email: Option<&str>) -> Result<(), ApiError> {
    if let Some(email) = email.filter(|e| !e.trim().is_empty()) {
        validate_email(email)?;
    }
    Ok(())
}

pub(crate) fn validate_dates(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), ApiError> {
    if end.is_some_and(|end| end < start) {
        return Err(ApiError::validation(
            "End date must be on or after the start date",
        ));
    }
    Ok(())
}
