use crate::{
    auth_jwt::{TokenPair, TokenType},
    entity::user,
    error::ApiError,
    routes::JsonBody,
    state::AppState,
};
use axum::{Json, extract::State};
use sea_orm::EntityTrait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /auth/refresh - Exchange a refresh token for a new token pair
#[tracing::instrument(name = "POST /auth/refresh", skip(state, body))]
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let claims = state
        .tokens
        .verify(body.refresh_token.trim(), TokenType::Refresh)?;

    let account = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::unauthorized("User not found or inactive"))?;

    Ok(Json(state.tokens.issue_pair(
        &account.id,
        &account.username,
        account.role,
    )?))
}
