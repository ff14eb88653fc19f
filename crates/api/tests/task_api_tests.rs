use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use taskboard_api::create_app;
use taskboard_core::{ApiConfig, DatabaseConfig};
use taskboard_infrastructure::{DatabaseManager, InMemoryTaskRepository};

fn test_app() -> Router {
    create_app(Arc::new(InMemoryTaskRepository::new()), &ApiConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, task) = send(app, Method::POST, "/api/tasks", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    task
}

#[tokio::test]
async fn test_root_and_health() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task Manager API is running");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_create_with_defaults() {
    let app = test_app();
    let task = create(&app, json!({ "title": "Buy milk" })).await;

    assert_eq!(task["title"], "Buy milk");
    assert_eq!(task["status"], "pending");
    assert_eq!(task["description"], "");
    assert!(task["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(task["createdAt"].is_string());
    assert!(task["updatedAt"].is_string());
}

#[tokio::test]
async fn test_create_rejects_blank_title_without_persisting() {
    let app = test_app();

    for body in [json!({ "title": "" }), json!({ "title": "   " }), json!({})] {
        let (status, error) = send(&app, Method::POST, "/api/tasks", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "Task title is required");
    }

    let (_, tasks) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(tasks, json!([]));
}

#[tokio::test]
async fn test_create_rejects_invalid_status() {
    let app = test_app();
    let (status, error) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "x", "status": "archived" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap().contains("archived"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/tasks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_list_newest_first_and_filter() {
    let app = test_app();
    let first = create(&app, json!({ "title": "first" })).await;
    let second = create(&app, json!({ "title": "second", "status": "done" })).await;

    let (status, tasks) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks[0]["id"], second["id"]);
    assert_eq!(tasks[1]["id"], first["id"]);

    let (_, done) = send(&app, Method::GET, "/api/tasks?status=done", None).await;
    assert_eq!(done.as_array().unwrap().len(), 1);
    assert_eq!(done[0]["status"], "done");

    let (_, none) = send(&app, Method::GET, "/api/tasks?status=in-progress", None).await;
    assert_eq!(none, json!([]));

    let (status, all) = send(&app, Method::GET, "/api/tasks?status=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, Method::GET, "/api/tasks?status=finished", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_status_then_get() {
    let app = test_app();
    let task = create(&app, json!({ "title": "Ship it", "description": "v1" })).await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({ "status": "done" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "done");
    assert_eq!(updated["title"], "Ship it");
    assert_eq!(updated["description"], "v1");

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched["status"], "done");
    let before = task["updatedAt"].as_str().unwrap().parse::<DateTime<Utc>>().unwrap();
    let after = fetched["updatedAt"].as_str().unwrap().parse::<DateTime<Utc>>().unwrap();
    assert!(after > before);
}

#[tokio::test]
async fn test_update_validation_and_clearing() {
    let app = test_app();
    let task = create(&app, json!({ "title": "Plan", "description": "notes" })).await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (status, error) = send(&app, Method::PUT, &uri, Some(json!({ "title": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "Task title is required");

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "status": "later" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, cleared) =
        send(&app, Method::PUT, &uri, Some(json!({ "description": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["description"], "");
    assert_eq!(cleared["title"], "Plan");
}

#[tokio::test]
async fn test_missing_and_malformed_ids_are_not_found() {
    let app = test_app();
    let missing = "/api/tasks/7d4f3a9e-2b1c-4d5e-8f6a-0b1c2d3e4f5a";

    for uri in [missing, "/api/tasks/not-an-id"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found");

        let (status, _) = send(&app, Method::PUT, uri, Some(json!({ "status": "done" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_delete_then_get_and_delete_again() {
    let app = test_app();
    let task = create(&app, json!({ "title": "Temp" })).await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found");
}

#[tokio::test]
async fn test_round_trip_trims_fields() {
    let app = test_app();
    let task = create(
        &app,
        json!({ "title": "  Read book ", "description": " chapter 3 ", "status": "in-progress" }),
    )
    .await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched["title"], "Read book");
    assert_eq!(fetched["description"], "chapter 3");
    assert_eq!(fetched["status"], "in-progress");
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_sqlite_backed_app_and_unhealthy_store() {
    let manager = DatabaseManager::new(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..Default::default()
    })
    .await
    .unwrap();
    let app = create_app(manager.task_repository(), &ApiConfig::default());

    let task = create(&app, json!({ "title": "stored in sqlite" })).await;
    let (status, tasks) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks[0]["id"], task["id"]);

    manager.close().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "unreachable");

    let (status, body) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_wrong_method_returns_json_405() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/api/tasks")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().contains_key(header::ALLOW));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Method Not Allowed");
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let app = test_app();
    let huge = "x".repeat(3 * 1024 * 1024);
    let (status, body) = send(&app, Method::POST, "/api/tasks", Some(json!({ "title": huge }))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    let (_, tasks) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(tasks, json!([]));
}
