use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use hyper::header::AUTHORIZATION;
use sea_orm::EntityTrait;

use crate::{
    auth_jwt::TokenType,
    entity::{sea_orm_active_enums::UserRole, user},
    error::ApiError,
    permission::{RolePermissions, has_permission},
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub username: String,
    pub role: UserRole,
}

#[derive(Debug, Clone)]
pub enum AppUser {
    Authenticated(AuthenticatedUser),
    Unauthorized,
}

impl AppUser {
    pub fn sub(&self) -> Result<String, ApiError> {
        match self {
            AppUser::Authenticated(user) => Ok(user.sub.clone()),
            AppUser::Unauthorized => Err(ApiError::unauthorized("Authentication required")),
        }
    }

    pub fn authenticated(&self) -> Result<&AuthenticatedUser, ApiError> {
        match self {
            AppUser::Authenticated(user) => Ok(user),
            AppUser::Unauthorized => Err(ApiError::unauthorized("Authentication required")),
        }
    }

    /// 401 without a user, 403 when the role lacks `permission`.
    pub fn authorize(&self, permission: RolePermissions) -> Result<&AuthenticatedUser, ApiError> {
        let user = self.authenticated()?;
        if !has_permission(user.role, permission) {
            return Err(ApiError::forbidden(format!(
                "Role {:?} lacks permission {:?}",
                user.role, permission
            )));
        }
        Ok(user)
    }

    pub fn can(&self, permission: RolePermissions) -> bool {
        matches!(self, AppUser::Authenticated(user) if has_permission(user.role, permission))
    }

    pub async fn get_user(&self, state: &AppState) -> Result<user::Model, ApiError> {
        let sub = self.sub()?;
        user::Entity::find_by_id(sub)
            .one(&state.db)
            .await?
            .ok_or(ApiError::NOT_FOUND)
    }
}

/// Resolves the bearer token into an [`AppUser`] extension.
///
/// Requests without a token continue as [`AppUser::Unauthorized`]; handlers decide
/// whether that is acceptable. A token that fails verification, or belongs to a
/// missing or deactivated account, is rejected right away.
pub async fn jwt_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(auth_header) = request.headers().get(AUTHORIZATION)
        && let Ok(token) = auth_header.to_str()
    {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        let claims = state.tokens.verify(token, TokenType::Access)?;

        let account = user::Entity::find_by_id(claims.sub.clone())
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User no longer exists"))?;
        if !account.is_active {
            return Err(ApiError::unauthorized("Account is deactivated"));
        }

        let user = AppUser::Authenticated(AuthenticatedUser {
            sub: account.id,
            username: account.username,
            role: account.role,
        });
        request.extensions_mut().insert::<AppUser>(user);
        return Ok(next.run(request).await);
    }

    request
        .extensions_mut()
        .insert::<AppUser>(AppUser::Unauthorized);
    Ok(next.run(request).await)
}
