use crate::{
    entity::{customer, sea_orm_active_enums::CustomerType},
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    routes::{JsonBody, deserialize_opt_date, deserialize_patch_date},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use serde::Deserialize;

use super::{find_customer, validate_dates, validate_name, validate_optional_email};

/// Absent fields stay unchanged. `endDate: null` reactivates the customer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub customer_type: Option<CustomerType>,
    pub company_name: Option<String>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_patch_date")]
    pub end_date: Option<Option<NaiveDate>>,
    pub notes: Option<String>,
}

/// PUT /customers/{customer_id}
#[tracing::instrument(name = "PUT /customers/{customer_id}", skip(state, user, body))]
pub async fn update_customer(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(customer_id): Path<String>,
    JsonBody(body): JsonBody<UpdateCustomerRequest>,
) -> Result<Json<customer::Model>, ApiError> {
    user.authorize(RolePermissions::WriteCustomers)?;

    let existing = find_customer(&state.db, &customer_id).await?;

    if let Some(name) = &body.name {
        validate_name(name)?;
    }
    validate_optional_email(body.email.as_deref())?;

    let start_date = body.start_date.unwrap_or(existing.start_date);
    let end_date = body.end_date.unwrap_or(existing.end_date);
    validate_dates(start_date, end_date)?;

    let customer_type = body.customer_type.unwrap_or(existing.customer_type);
    let company_name = match customer_type {
        CustomerType::Business => body.company_name.or(existing.company_name.clone()),
        CustomerType::Private => None,
    };

    let mut active: customer::ActiveModel = existing.into();
    if let Some(name) = body.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(email) = body.email {
        active.email = Set(Some(email).filter(|e| !e.trim().is_empty()));
    }
    if let Some(phone) = body.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(address) = body.address {
        active.address = Set(Some(address));
    }
    if let Some(notes) = body.notes {
        active.notes = Set(Some(notes));
    }
    active.customer_type = Set(customer_type);
    active.company_name = Set(company_name);
    active.start_date = Set(start_date);
    active.end_date = Set(end_date);
    active.updated_at = Set(Utc::now().naive_utc());

    Ok(Json(active.update(&state.db).await?))
}
