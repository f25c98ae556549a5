use crate::{
    aggregation::snapshot::MonthWindow,
    entity::monthly_metric,
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    routes::QueryParams,
    state::AppState,
};
use axum::{Extension, Json, extract::State};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Deserialize;

const DEFAULT_LIMIT: u64 = 12;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsQuery {
    /// Inclusive lower bound (YYYY-MM)
    pub start_month: Option<String>,
    /// Inclusive upper bound (YYYY-MM)
    pub end_month: Option<String>,
    pub limit: Option<String>,
}

/// GET /metrics - Snapshots, newest first
#[tracing::instrument(name = "GET /metrics", skip(state, user))]
pub async fn list_metrics(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    QueryParams(query): QueryParams<MetricsQuery>,
) -> Result<Json<Vec<monthly_metric::Model>>, ApiError> {
    user.authorize(RolePermissions::ReadMetrics)?;

    let limit = query
        .limit
        .as_deref()
        .and_then(|l| l.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(1, state.config.pagination.max_limit.max(1));

    let mut select = monthly_metric::Entity::find();
    if let Some(start) = query.start_month.as_deref().filter(|m| !m.is_empty()) {
        let start = MonthWindow::from_key(start)?;
        select = select.filter(monthly_metric::Column::Month.gte(start.key()));
    }
    if let Some(end) = query.end_month.as_deref().filter(|m| !m.is_empty()) {
        let end = MonthWindow::from_key(end)?;
        select = select.filter(monthly_metric::Column::Month.lte(end.key()));
    }

    let metrics = select
        .order_by_desc(monthly_metric::Column::Month)
        .limit(limit)
        .all(&state.db)
        .await?;

    Ok(Json(metrics))
}
