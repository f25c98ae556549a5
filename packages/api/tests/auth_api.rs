mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;
use storage_metrics_api::entity::sea_orm_active_enums::UserRole;

#[tokio::test]
async fn test_register_login_and_refresh() {
    let app = TestApp::new().await;

    let (status, registered) = app
        .request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "newhire",
                "email": "NewHire@Example.com",
                "password": "hunter22",
                "role": "admin"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["user"]["role"], "staff");
    assert_eq!(registered["user"]["email"], "newhire@example.com");
    assert!(registered["user"].get("passwordHash").is_none());

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "newhire@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, session) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "newhire", "password": "hunter22" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let access = session["accessToken"].as_str().expect("access token");
    let refresh = session["refreshToken"].as_str().expect("refresh token");

    let (status, me) = app.get("/api/v1/auth/me", access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "newhire");
    assert!(!me["lastLogin"].is_null());

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({ "refreshToken": access })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, pair) = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({ "refreshToken": refresh })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(pair["accessToken"].is_string());
}

#[tokio::test]
async fn test_admin_registers_with_role() {
    let app = TestApp::new().await;
    let admin = app.token("admin", UserRole::Admin).await;

    let (status, registered) = app
        .post(
            "/api/v1/auth/register",
            &admin,
            json!({
                "username": "lead",
                "email": "lead@example.com",
                "password": "hunter22",
                "role": "manager"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["user"]["role"], "manager");

    let (status, body) = app
        .post(
            "/api/v1/auth/register",
            &admin,
            json!({ "username": "lead", "email": "other@example.com", "password": "hunter22" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new().await;
    let token = app.token("clerk", UserRole::Staff).await;

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/v1/auth/password",
            Some(&token),
            Some(json!({ "currentPassword": "password123", "newPassword": "s3cure-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "login": "clerk", "password": "s3cure-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
