use crate::{entity::user, error::ApiError, middleware::jwt::AppUser, state::AppState};
use axum::{Extension, Json, extract::State};

/// GET /auth/me
#[tracing::instrument(name = "GET /auth/me", skip(state, user))]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<Json<user::Model>, ApiError> {
    Ok(Json(user.get_user(&state).await?))
}
