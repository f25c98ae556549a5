//! In-process harness: an in-memory SQLite database behind the full router.

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use std::sync::Arc;
use storage_metrics_api::{
    config::ApiConfig,
    construct_router,
    entity::{create_tables, sea_orm_active_enums::UserRole},
    sea_orm::{ConnectOptions, Database},
    state::{AppState, State},
    user_management::{NewUser, create_user},
};
use tower::ServiceExt;

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        // One connection, otherwise every pooled connection sees its own empty database.
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options)
            .await
            .expect("Failed to open in-memory database");
        create_tables(&db).await.expect("Failed to create tables");

        let config = ApiConfig::new("sqlite::memory:", "integration-test-secret");
        let state: AppState = Arc::new(State::with_connection(config, db));
        let router = construct_router(state.clone());

        Self { state, router }
    }

    /// Creates an account with `role` and returns an access token for it.
    pub async fn token(&self, username: &str, role: UserRole) -> String {
        let user = create_user(
            &self.state.db,
            NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "password123".to_string(),
                role,
            },
        )
        .await
        .expect("Failed to create user");

        self.state
            .tokens
            .issue_pair(&user.id, &user.username, user.role)
            .expect("Failed to sign token")
            .access_token
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("Failed to build request"))
            .await
    }

    /// Posts `body` as is, with `content_type` when given.
    pub async fn post_raw(
        &self,
        uri: &str,
        token: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        self.send(
            builder
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }
}

pub fn current_month() -> String {
    chrono::Utc::now().format("%Y-%m").to_string()
}
