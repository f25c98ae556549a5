use crate::{
    entity::sea_orm_active_enums::UserRole,
    error::ApiError,
    middleware::jwt::AppUser,
    permission::RolePermissions,
    routes::JsonBody,
    state::AppState,
    user_management::{NewUser, create_user},
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;

use super::AuthResponse;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
}

/// POST /auth/register
///
/// Open to everyone. Only callers allowed to manage users may pick a role;
/// everyone else is registered as staff.
#[tracing::instrument(name = "POST /auth/register", skip(state, user, body))]
pub async fn register(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let role = match body.role {
        Some(role) if user.can(RolePermissions::ManageUsers) => role,
        _ => UserRole::Staff,
    };

    let created = create_user(
        &state.db,
        NewUser {
            username: body.username,
            email: body.email,
            password: body.password,
            role,
        },
    )
    .await?;

    let tokens = state
        .tokens
        .issue_pair(&created.id, &created.username, created.role)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: created,
            tokens,
        }),
    ))
}
