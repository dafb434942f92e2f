mod helpers;

use axum::http::StatusCode;
use helpers::{NOTE_TEXT, NOTE_TITLE, TestApp, body_string};
use serde_json::{Value, json};

async fn json_body(response: axum::http::Response<axum::body::Body>) -> Value {
    serde_json::from_str(&body_string(response).await).expect("body is json")
}

#[tokio::test]
async fn anonymous_gets_unauthorized() {
    let app = TestApp::new();

    let response = app.get("/api/notes", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_read_update_delete() {
    let app = TestApp::new();
    let author = app.login_as("author").await;

    let response = app
        .send_json(
            "POST",
            "/api/notes",
            Some(&author),
            &json!({ "title": NOTE_TITLE, "text": NOTE_TEXT }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["slug"], "nazvanie-zametki");

    let response = app.get("/api/notes/nazvanie-zametki", Some(&author)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["text"], NOTE_TEXT);

    let response = app
        .send_json(
            "PUT",
            "/api/notes/nazvanie-zametki",
            Some(&author),
            &json!({ "title": "Renamed", "text": "Body", "slug": "renamed" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["slug"], "renamed");

    let response = app.get("/api/notes", Some(&author)).await;
    let list = json_body(response).await;
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let response = app.delete("/api/notes/renamed", Some(&author)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.note_count().await, 0);
}

#[tokio::test]
async fn duplicate_slug_is_bad_request() {
    let app = TestApp::new();
    let author = app.login_as("author").await;
    app.create_note(&author.user, NOTE_TITLE, NOTE_TEXT, "taken").await;

    let response = app
        .send_json(
            "POST",
            "/api/notes",
            Some(&author),
            &json!({ "title": "Other", "text": "Text", "slug": "taken" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["errors"]["slug"].as_array().map(Vec::len), Some(1));
    assert_eq!(app.note_count().await, 1);
}

#[tokio::test]
async fn foreign_note_is_not_found() {
    let app = TestApp::new();
    let author = app.login_as("author").await;
    let other = app.login_as("other").await;
    app.create_note(&author.user, NOTE_TITLE, NOTE_TEXT, "private").await;

    let response = app.get("/api/notes/private", Some(&other)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.delete("/api/notes/private", Some(&other)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.note_count().await, 1);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new();

    let response = app.get("/api/openapi.json", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert!(doc["paths"]["/api/notes"].is_object());
    assert!(doc["paths"]["/api/notes/{slug}"].is_object());
}
