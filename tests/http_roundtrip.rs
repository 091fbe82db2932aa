use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use student_registry::{
    api::create_router,
    students::{MemoryStudentStore, StudentService},
};
use tower::ServiceExt;

fn app_with_limit(limit: i64) -> Router {
    let service = StudentService::new(Arc::new(MemoryStudentStore::new()), limit);
    create_router(Arc::new(service))
}

fn app() -> Router {
    app_with_limit(1000)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    payload: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match payload {
        Some(payload) => {
            builder = builder.header("content-type", "application/json");
            Body::from(payload.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create(app: &Router, name: &str, age: i64, city: &str, country: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/students",
        Some(json!({
            "name": name,
            "age": age,
            "address": { "city": city, "country": country }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"].as_str().expect("id").to_string()
}

fn names(body: &Value) -> Vec<String> {
    let mut names: Vec<String> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|student| student["name"].as_str().expect("name").to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn create_fetch_delete_lifecycle() {
    let app = app();
    let id = create(&app, "Ann", 20, "Oslo", "NO").await;

    let (status, body) = call(&app, Method::GET, &format!("/students/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": id,
            "name": "Ann",
            "age": 20,
            "address": { "city": "Oslo", "country": "NO" }
        })
    );

    let (status, body) = call(&app, Method::DELETE, &format!("/students/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Student deleted successfully");

    let (status, body) = call(&app, Method::GET, &format!("/students/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Student not found");
}

#[tokio::test]
async fn list_without_filters_returns_everyone() {
    let app = app();
    create(&app, "Ann", 20, "Oslo", "NO").await;
    create(&app, "Bo", 31, "Lund", "SE").await;
    create(&app, "Cy", 17, "Bergen", "NO").await;

    let (status, body) = call(&app, Method::GET, "/students", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Ann", "Bo", "Cy"]);
}

#[tokio::test]
async fn list_filters_by_country_and_minimum_age() {
    let app = app();
    create(&app, "Ann", 20, "Oslo", "NO").await;
    create(&app, "Bo", 31, "Lund", "SE").await;
    create(&app, "Cy", 17, "Bergen", "NO").await;

    let (_, body) = call(&app, Method::GET, "/students?country=NO", None).await;
    assert_eq!(names(&body), vec!["Ann", "Cy"]);

    let (_, body) = call(&app, Method::GET, "/students?age=20", None).await;
    assert_eq!(names(&body), vec!["Ann", "Bo"]);

    let (_, body) = call(&app, Method::GET, "/students?country=NO&age=18", None).await;
    assert_eq!(names(&body), vec!["Ann"]);

    let (_, body) = call(&app, Method::GET, "/students?country=DK", None).await;
    assert!(names(&body).is_empty());
}

#[tokio::test]
async fn list_is_capped() {
    let app = app_with_limit(2);
    for name in ["Ann", "Bo", "Cy"] {
        create(&app, name, 20, "Oslo", "NO").await;
    }
    let (_, body) = call(&app, Method::GET, "/students", None).await;
    assert_eq!(body["data"].as_array().expect("data").len(), 2);
}

#[tokio::test]
async fn partial_update_leaves_other_fields_untouched() {
    let app = app();
    let id = create(&app, "Ann", 20, "Oslo", "NO").await;

    let (status, body) = call(
        &app,
        Method::PATCH,
        &format!("/students/{id}"),
        Some(json!({ "age": 21, "name": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (_, body) = call(&app, Method::GET, &format!("/students/{id}"), None).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "Ann");
    assert_eq!(body["age"], 21);
    assert_eq!(body["address"], json!({ "city": "Oslo", "country": "NO" }));

    call(
        &app,
        Method::PATCH,
        &format!("/students/{id}"),
        Some(json!({ "address": { "city": "Bergen", "country": "NO" } })),
    )
    .await;
    let (_, body) = call(&app, Method::GET, &format!("/students/{id}"), None).await;
    assert_eq!(body["age"], 21);
    assert_eq!(body["address"]["city"], "Bergen");
}

#[tokio::test]
async fn missing_identifiers_yield_not_found() {
    let app = app();
    let missing = "5f1d7f4e8b3e4a2d9c6b1a00";

    let (status, _) = call(&app, Method::GET, &format!("/students/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        Method::PATCH,
        &format!("/students/{missing}"),
        Some(json!({ "age": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, &format!("/students/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_identifiers_yield_not_found() {
    let app = app();
    for method in [Method::GET, Method::DELETE] {
        let (status, body) = call(&app, method, "/students/abc123", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Student not found");
    }

    let (status, body) = call(
        &app,
        Method::PATCH,
        "/students/abc123",
        Some(json!({ "age": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Student not found");
}

#[tokio::test]
async fn empty_update_on_malformed_identifier_still_succeeds() {
    let app = app();
    for payload in [json!({}), json!({ "name": null })] {
        let (status, body) = call(&app, Method::PATCH, "/students/abc123", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
    }
}

#[tokio::test]
async fn empty_update_is_a_successful_no_op() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::PATCH,
        "/students/5f1d7f4e8b3e4a2d9c6b1a00",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn create_rejects_incomplete_payload() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/students",
        Some(json!({ "name": "Ann", "address": { "city": "Oslo", "country": "NO" } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().expect("detail").contains("age"));

    let (_, body) = call(&app, Method::GET, "/students", None).await;
    assert!(names(&body).is_empty());
}

#[tokio::test]
async fn metrics_count_operations() {
    let app = app();
    let id = create(&app, "Ann", 20, "Oslo", "NO").await;
    call(&app, Method::GET, "/students", None).await;
    call(&app, Method::GET, &format!("/students/{id}"), None).await;
    call(&app, Method::DELETE, &format!("/students/{id}"), None).await;
    call(&app, Method::GET, &format!("/students/{id}"), None).await;

    let (status, body) = call(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "created": 1,
            "listed": 1,
            "fetched": 1,
            "updated": 0,
            "deleted": 1,
            "not_found": 1
        })
    );
}
