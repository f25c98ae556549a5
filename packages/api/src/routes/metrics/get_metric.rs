use crate::{
    aggregation::snapshot::MonthWindow,
    entity::monthly_metric,
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use sea_orm::EntityTrait;

/// GET /metrics/{month}
#[tracing::instrument(name = "GET /metrics/{month}", skip(state, user))]
pub async fn get_metric(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(month): Path<String>,
) -> Result<Json<monthly_metric::Model>, ApiError> {
    user.authorize(RolePermissions::ReadMetrics)?;

    let key = MonthWindow::from_key(&month)?.key();
    let metric = monthly_metric::Entity::find_by_id(key.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No metrics recorded for {key}")))?;

    Ok(Json(metric))
}
