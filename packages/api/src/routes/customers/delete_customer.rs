use crate::{
    entity::{customer, unit},
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    state::AppState,
};
use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use super::find_customer;

/// DELETE /customers/{customer_id} - Customers with rented units cannot be deleted
#[tracing::instrument(name = "DELETE /customers/{customer_id}", skip(state, user))]
pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(customer_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    user.authorize(RolePermissions::DeleteCustomers)?;

    let customer = find_customer(&state.db, &customer_id).await?;
    let rented = unit::Entity::find()
        .filter(unit::Column::CustomerId.eq(&customer.id))
        .count(&state.db)
        .await?;
    if rented > 0 {
        return Err(ApiError::bad_request(
            "Cannot delete customer with active unit rentals. Release units first.",
        ));
    }

    customer::Entity::delete_by_id(customer.id)
        .exec(&state.db)
        .await?;
    tracing::info!(customer_id = %customer_id, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}
