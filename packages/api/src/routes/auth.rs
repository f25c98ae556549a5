use crate::{auth_jwt::TokenPair, entity::user, state::AppState};
use axum::{
    Router,
    routing::{get, post, put},
};
use serde::Serialize;

pub mod change_password;
pub mod login;
pub mod me;
pub mod refresh;
pub mod register;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register::register))
        .route("/login", post(login::login))
        .route("/refresh", post(refresh::refresh))
        .route("/me", get(me::me))
        .route("/password", put(change_password::change_password))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: user::Model,
    #[serde(flatten)]
    pub tokens: TokenPair,
}
