use crate::{error::ApiError, routes::JsonBody, state::AppState, user_management::authenticate};
use axum::{Json, extract::State};
use serde::Deserialize;

use super::AuthResponse;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    #[serde(alias = "email", alias = "username")]
    pub login: String,
    pub password: String,
}

/// POST /auth/login
#[tracing::instrument(name = "POST /auth/login", skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let account = authenticate(&state.db, &body.login, &body.password).await?;
    let tokens = state
        .tokens
        .issue_pair(&account.id, &account.username, account.role)?;

    tracing::info!(user_id = %account.id, "User logged in");
    Ok(Json(AuthResponse {
        user: account,
        tokens,
    }))
}
