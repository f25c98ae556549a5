use crate::{
    error::ApiError, middleware::jwt::AppUser, routes::JsonBody, state::AppState, user_management,
};
use axum::{Extension, extract::State, http::StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// PUT /auth/password
#[tracing::instrument(name = "PUT /auth/password", skip(state, user, body))]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    JsonBody(body): JsonBody<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let sub = user.sub()?;
    user_management::change_password(&state.db, &sub, &body.current_password, &body.new_password)
        .await?;
    tracing::info!(user_id = %sub, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}
