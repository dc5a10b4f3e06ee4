//! Web API Authentication Tests
//!
//! Integration tests for the login and password-reset endpoints.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use serde_json::{json, Value};

use common::{create_test_app, seed_account};
use enrolld::db::ResetTokenRepository;
use enrolld::Role;

/// Helper to login and return the response body.
async fn login(server: &axum_test::TestServer, email: &str, password: &str) -> (StatusCode, Value) {
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": password
        }))
        .await;

    (response.status_code(), response.json::<Value>())
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let app = create_test_app().await;
    seed_account(&app.db, "school@example.com", "secret123xyz", Role::User, "Lahore").await;

    let (status, body) = login(&app.server, "school@example.com", "secret123xyz").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
    assert_eq!(body["data"]["account"]["email"], "school@example.com");
    assert_eq!(body["data"]["account"]["role"], "user");
    assert_eq!(body["data"]["account"]["district"], "Lahore");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app().await;
    seed_account(&app.db, "school@example.com", "secret123xyz", Role::User, "Lahore").await;

    let (status, body) = login(&app.server, "school@example.com", "wrong-password").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_unknown_email_same_message() {
    let app = create_test_app().await;
    seed_account(&app.db, "school@example.com", "secret123xyz", Role::User, "Lahore").await;

    let (wrong_status, wrong_body) =
        login(&app.server, "school@example.com", "wrong-password").await;
    let (unknown_status, unknown_body) =
        login(&app.server, "nobody@example.com", "whatever123").await;

    // No account enumeration: both failures look identical
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body["error"]["message"], unknown_body["error"]["message"]);
}

#[tokio::test]
async fn test_login_invalid_email_format() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": "not-an-email",
            "password": "whatever123"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_response_never_contains_hash() {
    let app = create_test_app().await;
    seed_account(&app.db, "a@x.com", "secret123xyz", Role::User, "Lahore").await;

    let (_, body) = login(&app.server, "a@x.com", "secret123xyz").await;
    assert!(!body.to_string().contains("argon2"));
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_me_with_session() {
    let app = create_test_app().await;
    seed_account(&app.db, "admin@example.com", "secret123xyz", Role::Admin, "Karachi").await;

    let (_, body) = login(&app.server, "admin@example.com", "secret123xyz").await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let response = app
        .server
        .get("/api/auth/me")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(body["data"]["district"], "Karachi");
}

#[tokio::test]
async fn test_me_without_session() {
    let app = create_test_app().await;

    let response = app.server.get("/api/auth/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sessions_vary_between_logins() {
    let app = create_test_app().await;
    seed_account(&app.db, "a@x.com", "secret123xyz", Role::User, "Lahore").await;

    let (_, first) = login(&app.server, "a@x.com", "secret123xyz").await;
    let (_, second) = login(&app.server, "a@x.com", "secret123xyz").await;

    // The random key makes every issued token distinct
    assert_ne!(first["data"]["token"], second["data"]["token"]);
}

// ============================================================================
// Reset Request Tests
// ============================================================================

#[tokio::test]
async fn test_reset_password_registered_email() {
    let app = create_test_app().await;
    let account_id =
        seed_account(&app.db, "a@x.com", "secret123xyz", Role::User, "Lahore").await;

    let response = app
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "email": "a@x.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(
        body["message"],
        "If the email is registered, a reset link has been sent."
    );

    // One token persisted, and the emailed link carries exactly that token
    let tokens = ResetTokenRepository::new(app.db.pool());
    assert_eq!(tokens.count_for_account(account_id).await.unwrap(), 1);

    common::wait_for_sent_mail(&app.mailer, 1).await;
    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    let token: String = sqlx::query_scalar("SELECT token FROM reset_tokens")
        .fetch_one(app.db.pool())
        .await
        .unwrap();
    assert!(sent[0].2.contains(&token));
}

#[tokio::test]
async fn test_reset_password_unknown_email_uniform_response() {
    let app = create_test_app().await;
    seed_account(&app.db, "a@x.com", "secret123xyz", Role::User, "Lahore").await;

    let known = app
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "email": "a@x.com" }))
        .await;
    let unknown = app
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "email": "nobody@x.com" }))
        .await;

    // Identical status and body regardless of registration state
    assert_eq!(known.status_code(), unknown.status_code());
    assert_eq!(known.json::<Value>(), unknown.json::<Value>());

    // But the unknown email created no token and no mail
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reset_tokens")
        .fetch_one(app.db.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
    common::wait_for_sent_mail(&app.mailer, 1).await;
    assert_eq!(app.mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_reset_password_invalid_email_format() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "email": "not-an-email" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_repeated_reset_requests_issue_new_tokens() {
    let app = create_test_app().await;
    let account_id =
        seed_account(&app.db, "a@x.com", "secret123xyz", Role::User, "Lahore").await;

    for _ in 0..2 {
        app.server
            .post("/api/auth/reset-password")
            .json(&json!({ "email": "a@x.com" }))
            .await;
    }

    // Old unconsumed tokens remain; each request adds a fresh one
    let tokens = ResetTokenRepository::new(app.db.pool());
    assert_eq!(tokens.count_for_account(account_id).await.unwrap(), 2);
}

// ============================================================================
// Change Password Tests
// ============================================================================

/// Request a reset and fish the issued token out of the database.
async fn request_and_fetch_token(app: &common::TestApp, email: &str) -> String {
    app.server
        .post("/api/auth/reset-password")
        .json(&json!({ "email": email }))
        .await;

    sqlx::query_scalar("SELECT token FROM reset_tokens ORDER BY id DESC LIMIT 1")
        .fetch_one(app.db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_change_password_full_flow() {
    let app = create_test_app().await;
    seed_account(&app.db, "a@x.com", "secret123", Role::User, "Lahore").await;

    let token = request_and_fetch_token(&app, "a@x.com").await;

    let response = app
        .server
        .put("/api/auth/change-password")
        .json(&json!({ "token": token, "password": "newpass456" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["message"],
        "Password updated successfully"
    );

    // Old credential fails, new one logs in
    let (old_status, _) = login(&app.server, "a@x.com", "secret123").await;
    assert_eq!(old_status, StatusCode::UNAUTHORIZED);
    let (new_status, _) = login(&app.server, "a@x.com", "newpass456").await;
    assert_eq!(new_status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_token_is_single_use() {
    let app = create_test_app().await;
    seed_account(&app.db, "a@x.com", "secret123", Role::User, "Lahore").await;

    let token = request_and_fetch_token(&app, "a@x.com").await;

    let first = app
        .server
        .put("/api/auth/change-password")
        .json(&json!({ "token": token, "password": "newpass456" }))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let second = app
        .server
        .put("/api/auth/change-password")
        .json(&json!({ "token": token, "password": "another789" }))
        .await;
    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);

    // The replay must not have changed the password again
    let (status, _) = login(&app.server, "a@x.com", "newpass456").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_unknown_token() {
    let app = create_test_app().await;

    let response = app
        .server
        .put("/api/auth/change-password")
        .json(&json!({ "token": "no-such-token", "password": "newpass456" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("try resetting your password again"));
}

#[tokio::test]
async fn test_change_password_expired_token() {
    let app = create_test_app().await;
    let account_id =
        seed_account(&app.db, "a@x.com", "secret123", Role::User, "Lahore").await;

    // Insert a token already past the 30-minute window
    sqlx::query(
        "INSERT INTO reset_tokens (account_id, token, created_at)
         VALUES ($1, $2, datetime('now', '-45 minutes'))",
    )
    .bind(account_id)
    .bind("stale-token")
    .execute(app.db.pool())
    .await
    .unwrap();

    let response = app
        .server
        .put("/api/auth/change-password")
        .json(&json!({ "token": "stale-token", "password": "newpass456" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_change_password_rejects_short_password() {
    let app = create_test_app().await;
    seed_account(&app.db, "a@x.com", "secret123", Role::User, "Lahore").await;

    let token = request_and_fetch_token(&app, "a@x.com").await;

    let response = app
        .server
        .put("/api/auth/change-password")
        .json(&json!({ "token": token, "password": "short" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    // Token must still be usable after the rejected attempt
    let retry = app
        .server
        .put("/api/auth/change-password")
        .json(&json!({ "token": token, "password": "longenough1" }))
        .await;
    assert_eq!(retry.status_code(), StatusCode::OK);
}

// ============================================================================
// Health Check
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");
}
