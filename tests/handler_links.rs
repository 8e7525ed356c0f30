mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

const ALICE: &str = "8c0e1d2a-6b7f-4a3e-9f10-aa11bb22cc33";
const BOB: &str = "1f2e3d4c-5b6a-4789-8a9b-0c1d2e3f4a5b";

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_shorten_success() {
    let app = common::spawn_app();
    let token = app.register(ALICE).await;

    let response = app
        .server
        .post("/api/urls")
        .add_header("Authorization", common::bearer(&token))
        .json(&json!({ "fullURL": "https://example.com/some/long/path" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    let code = body["shortCode"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(body["fullURL"], "https://example.com/some/long/path");
    assert_eq!(body["userUUID"], ALICE);
    assert!(body["createdAt"].is_string());
    assert!(body["expiresAt"].is_string());
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let app = common::spawn_app();
    let token = app.register(ALICE).await;

    let response = app
        .server
        .post("/api/urls")
        .add_header("Authorization", common::bearer(&token))
        .json(&json!({ "fullURL": "not-a-url" }))
        .await;

    response.assert_status_bad_request();

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_shorten_unsafe_url() {
    let app = common::spawn_app();
    let token = app.register(ALICE).await;

    let response = app
        .server
        .post("/api/urls")
        .add_header("Authorization", common::bearer(&token))
        .json(&json!({ "fullURL": "https://malware.test/payload" }))
        .await;

    response.assert_status_bad_request();

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "url_safety_check_failed");
    assert_eq!(body["error"]["message"], "This URL is not safe");

    // Nothing was stored.
    let list: Value = app
        .server
        .get("/api/urls")
        .add_header("Authorization", common::bearer(&token))
        .await
        .json();
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_shorten_unregistered_user() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/urls")
        .add_header("Authorization", common::bearer(&common::token_for(ALICE)))
        .json(&json!({ "fullURL": "https://example.com" }))
        .await;

    response.assert_status_unauthorized();

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "user_not_found");
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_only_own_links() {
    let app = common::spawn_app();
    let alice = app.register(ALICE).await;
    let bob = app.register(BOB).await;

    for url in ["https://a.example.com", "https://b.example.com"] {
        app.server
            .post("/api/urls")
            .add_header("Authorization", common::bearer(&alice))
            .json(&json!({ "fullURL": url }))
            .await
            .assert_status(StatusCode::CREATED);
    }
    app.server
        .post("/api/urls")
        .add_header("Authorization", common::bearer(&bob))
        .json(&json!({ "fullURL": "https://c.example.com" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .get("/api/urls")
        .add_header("Authorization", common::bearer(&alice))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    let links = body.as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l["userUUID"] == ALICE));
}

// ─── UPDATE ──────────────────────────────────────────────────────────────────

async fn create_link(app: &common::TestApp, token: &str, url: &str) -> String {
    let body: Value = app
        .server
        .post("/api/urls")
        .add_header("Authorization", common::bearer(token))
        .json(&json!({ "fullURL": url }))
        .await
        .json();
    body["shortCode"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_update_link_success() {
    let app = common::spawn_app();
    let token = app.register(ALICE).await;
    let code = create_link(&app, &token, "https://old.example.com").await;

    let response = app
        .server
        .patch(&format!("/api/urls/{}", code))
        .add_header("Authorization", common::bearer(&token))
        .json(&json!({ "fullURL": "https://new.example.com" }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["shortCode"], code.as_str());
    assert_eq!(body["fullURL"], "https://new.example.com");

    let redirect = app.server.get(&format!("/{}", code)).await;
    redirect.assert_status(StatusCode::FOUND);
    assert_eq!(redirect.header("location"), "https://new.example.com");
}

#[tokio::test]
async fn test_update_by_non_owner() {
    let app = common::spawn_app();
    let alice = app.register(ALICE).await;
    let bob = app.register(BOB).await;
    let code = create_link(&app, &alice, "https://example.com").await;

    let response = app
        .server
        .patch(&format!("/api/urls/{}", code))
        .add_header("Authorization", common::bearer(&bob))
        .json(&json!({ "fullURL": "https://hijack.example.com" }))
        .await;

    response.assert_status_unauthorized();

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "ownership_check_failed");
}

#[tokio::test]
async fn test_update_not_found() {
    let app = common::spawn_app();
    let token = app.register(ALICE).await;

    let response = app
        .server
        .patch("/api/urls/abcdef")
        .add_header("Authorization", common::bearer(&token))
        .json(&json!({ "fullURL": "https://example.com" }))
        .await;

    response.assert_status_not_found();

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_update_to_unsafe_url() {
    let app = common::spawn_app();
    let token = app.register(ALICE).await;
    let code = create_link(&app, &token, "https://example.com").await;

    app.server
        .patch(&format!("/api/urls/{}", code))
        .add_header("Authorization", common::bearer(&token))
        .json(&json!({ "fullURL": "https://malware.test/x" }))
        .await
        .assert_status_bad_request();

    let redirect = app.server.get(&format!("/{}", code)).await;
    assert_eq!(redirect.header("location"), "https://example.com");
}

#[tokio::test]
async fn test_malformed_code_rejected() {
    let app = common::spawn_app();
    let token = app.register(ALICE).await;

    let response = app
        .server
        .delete("/api/urls/NOT-HEX")
        .add_header("Authorization", common::bearer(&token))
        .await;

    response.assert_status_bad_request();
}

// ─── DELETE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_by_non_owner_keeps_link() {
    let app = common::spawn_app();
    let alice = app.register(ALICE).await;
    let bob = app.register(BOB).await;
    let code = create_link(&app, &alice, "https://example.com").await;

    app.server
        .delete(&format!("/api/urls/{}", code))
        .add_header("Authorization", common::bearer(&bob))
        .await
        .assert_status_unauthorized();

    app.server
        .get(&format!("/{}", code))
        .await
        .assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_delete_missing_code() {
    let app = common::spawn_app();
    let token = app.register(ALICE).await;

    app.server
        .delete("/api/urls/123abc")
        .add_header("Authorization", common::bearer(&token))
        .await
        .assert_status_not_found();
}

// ─── LIFECYCLE ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_lifecycle() {
    let app = common::spawn_app();
    let token = app.register(ALICE).await;
    let code = create_link(&app, &token, "https://example.com/landing").await;

    let redirect = app.server.get(&format!("/{}", code)).await;
    redirect.assert_status(StatusCode::FOUND);
    assert_eq!(redirect.header("location"), "https://example.com/landing");

    let analytics: Value = app
        .server
        .get(&format!("/api/analytics/{}", code))
        .add_header("Authorization", common::bearer(&token))
        .await
        .json();
    assert_eq!(analytics["shortCode"], code.as_str());
    assert_eq!(analytics["totalClicks"], 1);
    assert!(analytics["timeStampLastAccessed"].is_string());

    app.server
        .delete(&format!("/api/urls/{}", code))
        .add_header("Authorization", common::bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get(&format!("/{}", code))
        .await
        .assert_status_not_found();

    app.server
        .get(&format!("/api/analytics/{}", code))
        .add_header("Authorization", common::bearer(&token))
        .await
        .assert_status_not_found();
}
