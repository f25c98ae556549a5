use crate::{
    entity::{sea_orm_active_enums::UnitSize, unit},
    error::ApiError,
    middleware::jwt::AppUser,
    pagination::{PageRequest, Paginated},
    permission::RolePermissions,
    routes::{QueryParams, SortOrder, deserialize_lenient_bool},
    state::AppState,
};
use axum::{Extension, Json, extract::State};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

use super::{UnitResponse, with_customers};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Size label such as `10m²` (also accepts `10m2` or `10`)
    pub size: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub occupied: Option<bool>,
    /// Substring of the unit id
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// `None` means sorting by id, which is also the fallback for unknown fields.
fn sort_column(sort_by: Option<&str>) -> Option<unit::Column> {
    match sort_by {
        Some("size") => Some(unit::Column::Size),
        Some("pricePerMonth") => Some(unit::Column::PricePerMonth),
        Some("isOccupied") => Some(unit::Column::IsOccupied),
        Some("createdAt") => Some(unit::Column::CreatedAt),
        _ => None,
    }
}

/// GET /units
#[tracing::instrument(name = "GET /units", skip(state, user))]
pub async fn list_units(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    QueryParams(query): QueryParams<UnitsQuery>,
) -> Result<Json<Paginated<UnitResponse>>, ApiError> {
    user.authorize(RolePermissions::ReadUnits)?;

    let request = PageRequest::resolve(
        query.page.as_deref(),
        query.limit.as_deref(),
        &state.config.pagination,
    );

    let mut select = unit::Entity::find();
    if let Some(size) = query.size.as_deref().filter(|s| !s.trim().is_empty()) {
        let size: UnitSize = size.parse().map_err(ApiError::validation)?;
        select = select.filter(unit::Column::Size.eq(size));
    }
    if let Some(occupied) = query.occupied {
        select = select.filter(unit::Column::IsOccupied.eq(occupied));
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        select = select.filter(unit::Column::Id.contains(search));
    }

    let order = SortOrder::parse(query.sort_order.as_deref(), SortOrder::Asc).into_order();
    select = match sort_column(query.sort_by.as_deref()) {
        Some(column) => select
            .order_by(column, order)
            .order_by_asc(unit::Column::Id),
        None => select.order_by(unit::Column::Id, order),
    };

    let page = request.fetch(&state.db, select).await?;
    let Paginated {
        items,
        page,
        limit,
        total,
        total_pages,
    } = page;

    Ok(Json(Paginated {
        items: with_customers(&state.db, items).await?,
        page,
        limit,
        total,
        total_pages,
    }))
}
