use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use mood_journal_api::{create_router, MemoryStore};

fn app() -> Router {
    create_router(Arc::new(MemoryStore::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).expect("Failed to build request"))
        .await
        .expect("Router is infallible");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).expect("Body is not JSON"))
}

async fn create(app: &Router, title: &str, entry: &str) -> Value {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/journal",
        Some(json!({"title": title, "entry": entry})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Journal saved.");
    body["entry"].clone()
}

#[tokio::test]
async fn welcome_text() {
    let (status, body) = send(&app(), Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Welcome to MoodTracker API!");
}

#[tokio::test]
async fn static_user_profile() {
    let (status, body) = send_json(&app(), Method::GET, "/api/user", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "name": "Supun Hewagamage",
            "age": 21,
            "interests": ["coding", "hacking", "pizza"],
            "mood": "burntout",
            "favourite_programming_language": "Java"
        })
    );
}

#[tokio::test]
async fn status_reports_timestamp() {
    let (status, body) = send_json(&app(), Method::GET, "/api/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Server is healthy and alive");
    let timestamp = body["timestamp"].as_str().expect("timestamp is a string");
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn mood_echo() {
    let app = app();

    let (status, body) = send_json(&app, Method::POST, "/api/mood", Some(json!({"mood": "happy"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Mood received: happy. Stay strong, Supun."}));

    let (status, body) = send_json(&app, Method::POST, "/api/mood", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Mood is required."}));

    let (status, body) = send_json(&app, Method::POST, "/api/mood", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Mood is required."}));
}

#[tokio::test]
async fn create_with_empty_body_is_rejected() {
    let (status, body) = send_json(&app(), Method::POST, "/api/journal", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "At least one of title or entry is required."}));
}

#[tokio::test]
async fn create_with_single_field_fails_in_store() {
    let app = app();
    let (status, body) =
        send_json(&app, Method::POST, "/api/journal", Some(json!({"title": "Only a title"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to save journal entry."}));

    let (_, entries) = send_json(&app, Method::GET, "/api/journal", None).await;
    assert_eq!(entries, json!([]));
}

#[tokio::test]
async fn created_entry_reads_back_unchanged() {
    let app = app();
    let created = create(&app, "Happy day", "Had pizza").await;
    let id = created["_id"].as_str().expect("id is a string");

    let (status, fetched) = send_json(&app, Method::GET, &format!("/api/journal/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["title"], "Happy day");
    assert_eq!(fetched["entry"], "Had pizza");
}

#[tokio::test]
async fn search_is_case_insensitive_across_fields() {
    let app = app();
    let pizza = create(&app, "Happy day", "Had pizza").await;
    create(&app, "Rainy", "Stayed in").await;

    for query in ["pizza", "PIZZA", "happy"] {
        let (status, body) =
            send_json(&app, Method::GET, &format!("/api/journal?title={}", query), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([pizza.clone()]), "query {}", query);
    }

    let (_, all) = send_json(&app, Method::GET, "/api/journal", None).await;
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let (_, blank) = send_json(&app, Method::GET, "/api/journal?title=", None).await;
    assert_eq!(blank.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let app = app();
    let created = create(&app, "Happy day", "Had pizza").await;
    let uri = format!("/api/journal/{}", created["_id"].as_str().unwrap());

    let (status, body) =
        send_json(&app, Method::PUT, &uri, Some(json!({"entry": "updated text"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Journal entry updated.");
    assert_eq!(body["entry"]["entry"], "updated text");
    assert_eq!(body["entry"]["title"], "Happy day");
    assert_eq!(body["entry"]["date"], created["date"]);
}

#[tokio::test]
async fn update_errors() {
    let app = app();
    let created = create(&app, "Happy day", "Had pizza").await;
    let uri = format!("/api/journal/{}", created["_id"].as_str().unwrap());

    let (status, body) = send_json(&app, Method::PUT, &uri, Some(json!({"title": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "At least one of title or entry is required."}));

    let missing = format!("/api/journal/{}", uuid::Uuid::new_v4());
    let (status, body) = send_json(&app, Method::PUT, &missing, Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Journal entry not found"}));

    let (status, body) =
        send_json(&app, Method::PUT, "/api/journal/not-an-id", Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to update journal entry."}));
}

#[tokio::test]
async fn delete_twice() {
    let app = app();
    let created = create(&app, "Happy day", "Had pizza").await;
    let uri = format!("/api/journal/{}", created["_id"].as_str().unwrap());

    let (status, body) = send_json(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Journal entry deleted.");
    assert_eq!(body["entry"], created);

    let (status, body) = send_json(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Journal entry not found"}));

    let (status, _) = send_json(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_a_server_error() {
    let app = app();

    let (status, body) = send_json(&app, Method::GET, "/api/journal/not-an-id", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Invalid ID or entry not found."}));

    let (status, body) = send_json(&app, Method::DELETE, "/api/journal/not-an-id", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to delete journal entry."}));
}

#[tokio::test]
async fn unknown_routes_fall_through_to_404() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/nonexistent-path", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"404 - Page Not Found");

    let (status, body) = send(&app, Method::PATCH, "/api/journal", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"404 - Page Not Found");
}

#[tokio::test]
async fn falsy_mood_is_missing() {
    let app = app();

    for mood in [json!(0), json!(false)] {
        let (status, body) = send_json(&app, Method::POST, "/api/mood", Some(json!({"mood": mood}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Mood is required."}));
    }
}

#[tokio::test]
async fn falsy_update_fields_are_ignored() {
    let app = app();
    let created = create(&app, "Happy day", "Had pizza").await;
    let uri = format!("/api/journal/{}", created["_id"].as_str().unwrap());

    let (status, body) = send_json(&app, Method::PUT, &uri, Some(json!({"title": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "At least one of title or entry is required."}));

    let (status, body) =
        send_json(&app, Method::PUT, &uri, Some(json!({"title": false, "entry": "x"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["title"], "Happy day");
    assert_eq!(body["entry"]["entry"], "x");
}

#[tokio::test]
async fn repeated_title_query_is_a_retrieval_failure() {
    let app = app();
    create(&app, "Happy day", "Had pizza").await;

    let (status, body) = send_json(&app, Method::GET, "/api/journal?title=a&title=b", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to retrieve journal entries."}));
}
