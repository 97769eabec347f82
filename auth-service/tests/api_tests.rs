mod common;

use auth::TokenCodec;
use common::TestApp;
use common::ADMIN_PASSWORD;
use common::ADMIN_USERNAME;
use common::TEST_SECRET;
use reqwest::StatusCode;
use serde_json::json;

async fn register_user(app: &TestApp, username: &str, email: &str, password: &str) {
    let response = app
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn login_user(app: &TestApp, username: &str, password: &str) -> serde_json::Value {
    let response = app
        .post("/api/v1/auth/login")
        .json(&json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "pw1234567"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["role"], "USER");
    assert!(body["data"]["user_id"].is_i64());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::spawn().await;

    register_user(&app, "alice", "alice@example.com", "pw1234567").await;

    // same username, different email
    let response = app
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "pw1234567"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("Username already exists"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    register_user(&app, "alice", "alice@example.com", "pw1234567").await;

    let response = app
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": "alice2",
            "email": "alice@example.com",
            "password": "pw1234567"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("Email already exists"));
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "not-an-email",
            "password": "pw1234567"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_unknown_username() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/auth/login")
        .json(&json!({
            "username": "ghost",
            "password": "whatever"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;

    register_user(&app, "alice", "alice@example.com", "pw1234567").await;

    let response = app
        .post("/api/v1/auth/login")
        .json(&json!({
            "username": "alice",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    // generic rejection: no hint about which check failed
    assert_eq!(
        body["data"]["message"].as_str().unwrap(),
        "Incorrect username or password"
    );
}

#[tokio::test]
async fn test_validate_rejects_garbage_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/auth/validate")
        .json(&json!({ "token": "not.a.token" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_promote_requires_admin() {
    let app = TestApp::spawn().await;

    register_user(&app, "alice", "alice@example.com", "pw1234567").await;
    let alice = login_user(&app, "alice", "pw1234567").await;
    let alice_id = alice["user_id"].as_i64().unwrap();

    // anonymous
    let response = app
        .post(&format!("/api/v1/admin/users/{}/promote", alice_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // authenticated but not an admin
    let response = app
        .post(&format!("/api/v1/admin/users/{}/promote", alice_id))
        .header(
            "Authorization",
            format!("Bearer {}", alice["access_token"].as_str().unwrap()),
        )
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_promote_unknown_user() {
    let app = TestApp::spawn().await;

    let admin = login_user(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = app
        .post("/api/v1/admin/users/9999/promote")
        .header(
            "Authorization",
            format!("Bearer {}", admin["access_token"].as_str().unwrap()),
        )
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_token_lifecycle() {
    let app = TestApp::spawn().await;
    let codec = TokenCodec::new(TEST_SECRET);

    // register and log in
    register_user(&app, "alice", "alice@example.com", "pw1234567").await;
    let tokens = login_user(&app, "alice", "pw1234567").await;

    assert_eq!(tokens["token_type"], "Bearer");
    assert_eq!(tokens["role"], "USER");
    let access_token = tokens["access_token"].as_str().unwrap();
    let refresh_token = tokens["refresh_token"].as_str().unwrap();
    let alice_id = tokens["user_id"].as_i64().unwrap();

    // the freshly issued access token validates to a USER identity
    let response = app
        .post("/api/v1/auth/validate")
        .json(&json!({ "token": access_token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["valid"], true);
    assert_eq!(body["data"]["user_id"], alice_id);
    assert_eq!(body["data"]["role"], "USER");

    // admin promotes alice; her issued tokens still carry USER
    let admin = login_user(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let response = app
        .post(&format!("/api/v1/admin/users/{}/promote", alice_id))
        .header(
            "Authorization",
            format!("Bearer {}", admin["access_token"].as_str().unwrap()),
        )
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["role"], "ADMIN");

    let stale_claims = codec.validate(access_token).unwrap();
    assert_eq!(stale_claims.role().unwrap(), auth::Role::User);

    // refresh keeps the refresh token and picks up the promotion
    let response = app
        .post("/api/v1/auth/refresh")
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["refresh_token"], refresh_token);
    assert_eq!(body["data"]["role"], "ADMIN");

    let new_access = body["data"]["access_token"].as_str().unwrap();
    let refreshed_claims = codec.validate(new_access).unwrap();
    assert_eq!(refreshed_claims.role().unwrap(), auth::Role::Admin);
    assert_eq!(refreshed_claims.subject().unwrap(), "alice");
    assert_eq!(refreshed_claims.user_id().unwrap(), alice_id);
}

#[tokio::test]
async fn test_refresh_rejects_invalid_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/auth/refresh")
        .json(&json!({ "refresh_token": "not.a.token" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_promote_is_idempotent() {
    let app = TestApp::spawn().await;

    register_user(&app, "alice", "alice@example.com", "pw1234567").await;
    let alice = login_user(&app, "alice", "pw1234567").await;
    let alice_id = alice["user_id"].as_i64().unwrap();

    let admin = login_user(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let admin_header = format!("Bearer {}", admin["access_token"].as_str().unwrap());

    for _ in 0..2 {
        let response = app
            .post(&format!("/api/v1/admin/users/{}/promote", alice_id))
            .header("Authorization", &admin_header)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["data"]["role"], "ADMIN");
    }
}
