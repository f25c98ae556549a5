use crate::{
    aggregation::dashboard::active_on,
    entity::{customer, sea_orm_active_enums::CustomerType},
    error::ApiError,
    middleware::jwt::AppUser,
    pagination::{PageRequest, Paginated},
    permission::RolePermissions,
    routes::{QueryParams, SortOrder, deserialize_lenient_bool},
    state::AppState,
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

use super::{CustomerResponse, with_units};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "type")]
    pub customer_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub active: Option<bool>,
    /// Substring of name, email or company name
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

fn sort_column(sort_by: Option<&str>) -> customer::Column {
    match sort_by {
        Some("name") => customer::Column::Name,
        Some("type") => customer::Column::CustomerType,
        Some("startDate") => customer::Column::StartDate,
        Some("endDate") => customer::Column::EndDate,
        _ => customer::Column::CreatedAt,
    }
}

/// GET /customers
#[tracing::instrument(name = "GET /customers", skip(state, user))]
pub async fn list_customers(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    QueryParams(query): QueryParams<CustomersQuery>,
) -> Result<Json<Paginated<CustomerResponse>>, ApiError> {
    user.authorize(RolePermissions::ReadCustomers)?;

    let request = PageRequest::resolve(
        query.page.as_deref(),
        query.limit.as_deref(),
        &state.config.pagination,
    );
    let today = Utc::now().date_naive();

    let mut select = customer::Entity::find();
    if let Some(kind) = query.customer_type.as_deref().filter(|t| !t.trim().is_empty()) {
        let kind: CustomerType = kind.parse().map_err(ApiError::validation)?;
        select = select.filter(customer::Column::CustomerType.eq(kind));
    }
    match query.active {
        Some(true) => select = select.filter(active_on(today)),
        Some(false) => select = select.filter(customer::Column::EndDate.lt(today)),
        None => {}
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        select = select.filter(
            Condition::any()
                .add(customer::Column::Name.contains(search))
                .add(customer::Column::Email.contains(search))
                .add(customer::Column::CompanyName.contains(search)),
        );
    }

    let order = SortOrder::parse(query.sort_order.as_deref(), SortOrder::Desc).into_order();
    select = select
        .order_by(sort_column(query.sort_by.as_deref()), order)
        .order_by_asc(customer::Column::Id);

    let Paginated {
        items,
        page,
        limit,
        total,
        total_pages,
    } = request.fetch(&state.db, select).await?;

    Ok(Json(Paginated {
        items: with_units(&state.db, items).await?,
        page,
        limit,
        total,
        total_pages,
    }))
}
