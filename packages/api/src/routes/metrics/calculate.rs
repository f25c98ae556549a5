use crate::{
    aggregation::{CalculatedSnapshot, compute_current_snapshot},
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    state::AppState,
};
use axum::{Extension, Json, extract::State, http::StatusCode};

/// POST /metrics/calculate - Recompute the snapshot of the current month
///
/// Responds 201 when the month had no snapshot yet and 200 when it was overwritten.
#[tracing::instrument(name = "POST /metrics/calculate", skip(state, user))]
pub async fn calculate(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<(StatusCode, Json<CalculatedSnapshot>), ApiError> {
    let caller = user.authorize(RolePermissions::CalculateMetrics)?;

    let snapshot = compute_current_snapshot(&state.db).await?;
    tracing::info!(
        month = %snapshot.metric.month,
        created = snapshot.created,
        user_id = %caller.sub,
        "Metrics calculated"
    );

    let status = if snapshot.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(snapshot)))
}
