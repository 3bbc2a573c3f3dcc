//! Account and session integration tests
//!
//! - POST /api/auth/register
//! - POST /api/auth/login
//! - GET /api/auth/me
//! - PATCH /api/user/update

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{bearer, constants, TestApp};

#[tokio::test]
async fn test_register_returns_token_and_profile() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Ada Lovelace",
            "email": "Ada@Example.com",
            "password": "analytical"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["expiresAt"].is_string());
    assert_eq!(body["user"]["name"], "Ada Lovelace");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let app = TestApp::spawn().await;
    app.register("Ada", "ada@example.com").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Impostor",
            "email": "ADA@example.com",
            "password": "whatever"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "DUPLICATE_ENTRY");
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::spawn().await;

    let cases = [
        json!({"email": "a@b.co", "password": "secret1"}),
        json!({"name": "A", "email": "not-an-email", "password": "secret1"}),
        json!({"name": "A", "email": "a@b.co", "password": "short"}),
    ];

    for case in cases {
        let response = app.server.post("/api/auth/register").json(&case).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::spawn().await;
    app.register("Grace", "grace@example.com").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": "grace@example.com",
            "password": constants::TEST_PASSWORD
        }))
        .await;
    response.assert_status(StatusCode::OK);
    let token = response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    let (name, value) = bearer(&token);
    let me = app.server.get("/api/auth/me").add_header(name, value).await;
    me.assert_status(StatusCode::OK);

    let profile: Value = me.json();
    assert_eq!(profile["email"], "grace@example.com");
    assert_eq!(profile["name"], "Grace");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("Grace", "grace@example.com").await;

    let wrong_password = app
        .server
        .post("/api/auth/login")
        .json(&json!({"email": "grace@example.com", "password": "nope-nope"}))
        .await;
    let unknown_email = app
        .server
        .post("/api/auth/login")
        .json(&json!({"email": "nobody@example.com", "password": "nope-nope"}))
        .await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_email.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.text(), unknown_email.text());
}

#[tokio::test]
async fn test_protected_routes_reject_missing_and_forged_tokens() {
    let app = TestApp::spawn().await;
    let token = app.register("Ada", "ada@example.com").await;

    let missing = app.server.get("/api/favorites").await;
    missing.assert_status(StatusCode::UNAUTHORIZED);

    let (name, _) = bearer(&token);
    let wrong_scheme = app
        .server
        .get("/api/favorites")
        .add_header(name, format!("Token {}", token).parse().unwrap())
        .await;
    wrong_scheme.assert_status(StatusCode::UNAUTHORIZED);

    // Change the first character of the signature
    let (head, signature) = token.rsplit_once('.').unwrap();
    let first = if signature.starts_with('A') { 'B' } else { 'A' };
    let forged = format!("{}.{}{}", head, first, &signature[1..]);
    let (name, value) = bearer(&forged);
    let forged_response = app.server.get("/api/favorites").add_header(name, value).await;
    forged_response.assert_status(StatusCode::UNAUTHORIZED);

    assert_eq!(missing.text(), forged_response.text());
    let body: Value = missing.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_token_expires_after_lifetime() {
    let app = TestApp::spawn().await;
    let token = app.register("Ada", "ada@example.com").await;

    app.advance(chrono::Duration::days(6));
    let (name, value) = bearer(&token);
    app.server
        .get("/api/auth/me")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::OK);

    app.advance(chrono::Duration::days(2));
    let (name, value) = bearer(&token);
    app.server
        .get("/api/auth/me")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_update() {
    let app = TestApp::spawn().await;
    let token = app.register("Ada", "ada@example.com").await;

    let (name, value) = bearer(&token);
    let response = app
        .server
        .patch("/api/user/update")
        .add_header(name, value)
        .json(&json!({"image": "https://img.example/ada.png"}))
        .await;
    response.assert_status(StatusCode::OK);

    let profile: Value = response.json();
    assert_eq!(profile["name"], "Ada");
    assert_eq!(profile["image"], "https://img.example/ada.png");

    let (name, value) = bearer(&token);
    app.server
        .patch("/api/user/update")
        .add_header(name, value)
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_keeps_other_tasks_running() {
    let app = TestApp::spawn_with(|config| config.password_hash_cost = 10).await;
    let ticks = Arc::new(AtomicUsize::new(0));

    let ticker = {
        let ticks = ticks.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(1)).await;
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        })
    };

    app.register("Ada", "ada@example.com").await;
    ticker.abort();

    assert!(ticks.load(Ordering::SeqCst) > 0);
}

#[tokio::test]
async fn test_unknown_email_login_costs_a_password_check() {
    let app = TestApp::spawn_with(|config| config.password_hash_cost = 10).await;
    app.register("Grace", "grace@example.com").await;

    let started = Instant::now();
    app.server
        .post("/api/auth/login")
        .json(&json!({"email": "grace@example.com", "password": "nope-nope"}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    let wrong_password = started.elapsed();

    let started = Instant::now();
    app.server
        .post("/api/auth/login")
        .json(&json!({"email": "nobody@example.com", "password": "nope-nope"}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    let unknown_email = started.elapsed();

    assert!(
        unknown_email * 4 >= wrong_password,
        "unknown email took {:?}, wrong password took {:?}",
        unknown_email,
        wrong_password
    );
}

#[tokio::test]
async fn test_unreadable_bodies_use_error_envelope() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/api/auth/login")
        .bytes("{not json".into())
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "BAD_REQUEST");
}
