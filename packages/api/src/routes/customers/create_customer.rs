use crate::{
    entity::{customer, sea_orm_active_enums::CustomerType},
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    routes::{JsonBody, deserialize_opt_date},
    state::AppState,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, QuerySelect};
use serde::Deserialize;

use super::{next_customer_id, validate_name, validate_optional_email};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub company_name: Option<String>,
    pub address: Option<String>,
    /// Defaults to today
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub start_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// POST /customers
#[tracing::instrument(name = "POST /customers", skip(state, user, body))]
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    JsonBody(body): JsonBody<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<customer::Model>), ApiError> {
    user.authorize(RolePermissions::WriteCustomers)?;

    validate_name(&body.name)?;
    validate_optional_email(body.email.as_deref())?;

    let existing_ids: Vec<String> = customer::Entity::find()
        .select_only()
        .column(customer::Column::Id)
        .into_tuple()
        .all(&state.db)
        .await?;
    let id = next_customer_id(existing_ids.iter().map(String::as_str));

    let now = Utc::now().naive_utc();
    let company_name = match body.customer_type {
        CustomerType::Business => body.company_name,
        CustomerType::Private => None,
    };

    let created = customer::ActiveModel {
        id: Set(id),
        name: Set(body.name.trim().to_string()),
        email: Set(body.email.filter(|e| !e.trim().is_empty())),
        phone: Set(body.phone),
        customer_type: Set(body.customer_type),
        company_name: Set(company_name),
        address: Set(body.address),
        start_date: Set(body.start_date.unwrap_or(now.date())),
        end_date: Set(None),
        notes: Set(body.notes),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    tracing::info!(customer_id = %created.id, "Customer created");
    Ok((StatusCode::CREATED, Json(created)))
}
