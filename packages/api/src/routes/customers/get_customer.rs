use crate::{
    error::ApiError, middleware::jwt::AppUser, permission::RolePermissions, state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};

use super::{CustomerResponse, find_customer, with_units};

/// GET /customers/{customer_id}
#[tracing::instrument(name = "GET /customers/{customer_id}", skip(state, user))]
pub async fn get_customer(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(customer_id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    user.authorize(RolePermissions::ReadCustomers)?;

    let customer = find_customer(&state.db, &customer_id).await?;
    with_units(&state.db, vec![customer])
        .await?
        .pop()
        .map(Json)
        .ok_or(ApiError::NOT_FOUND)
}
