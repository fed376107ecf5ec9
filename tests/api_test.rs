//! Handler tests for the user CRUD routes.
//!
//! These tests drive the router with the in-memory repository, verifying:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error responses
//!
//! No database is required; the repository trait is swapped for the
//! in-memory implementation through the router's injected state.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use tower::ServiceExt; // For oneshot()

use user_api::api::handlers::user_routes;
use user_api::api::{create_router, AppState};
use user_api::infra::{Database, InMemoryUserRepository, UserRepository};

/// Build an app with a fresh in-memory store, returning the repository
/// handle for direct inspection.
fn app() -> (Router, Arc<InMemoryUserRepository>) {
    let repo = Arc::new(InMemoryUserRepository::new());
    let app = Router::new().nest("/users", user_routes(repo.clone()));
    (app, repo)
}

/// Build the full application router over a mock database connection,
/// for the routes outside the user CRUD surface.
fn service_app() -> Router {
    let connection = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let database = Arc::new(Database::from_connection(connection));
    let users = Arc::new(InMemoryUserRepository::new());
    create_router(AppState::new(users, database))
}

/// Parse a JSON response body
async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn root_returns_the_welcome_message() {
    let app = service_app();

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Welcome to User API");
}

#[tokio::test]
async fn health_reports_healthy_when_the_database_responds() {
    let app = service_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "healthy");
}

#[tokio::test]
async fn create_returns_201_with_the_created_record() {
    let (app, _) = app();

    let response = app
        .oneshot(post_json(
            "/users",
            json!({"name": "Ada", "email": "ada@x.com", "age": 30}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response.into_body()).await;
    assert!(body["message"].is_string());
    assert_eq!(body["user"]["id"], 1);
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["email"], "ada@x.com");
    assert_eq!(body["user"]["age"], 30);
}

#[tokio::test]
async fn create_with_malformed_json_returns_400_and_never_touches_the_store() {
    let (app, repo) = app();

    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert!(body["error"].is_string());

    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_with_missing_field_returns_400() {
    let (app, _) = app();

    let response = app
        .oneshot(post_json(
            "/users",
            json!({"name": "Ada", "email": "ada@x.com"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_unknown_field_returns_400() {
    let (app, _) = app();

    let response = app
        .oneshot(post_json(
            "/users",
            json!({"name": "Ada", "email": "ada@x.com", "age": 30, "role": "admin"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_empty_name_returns_400() {
    let (app, _) = app();

    let response = app
        .oneshot(post_json(
            "/users",
            json!({"name": "", "email": "ada@x.com", "age": 30}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_duplicate_email_returns_409() {
    let (app, _) = app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/users",
            json!({"name": "Ada", "email": "ada@x.com", "age": 30}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json(
            "/users",
            json!({"name": "Grace", "email": "ada@x.com", "age": 45}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response.into_body()).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn get_with_non_numeric_id_returns_400_without_store_call() {
    let (app, _) = app();

    for uri in ["/users/abc", "/users/-1", "/users/1.5"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);
    }
}

#[tokio::test]
async fn get_of_a_created_id_returns_the_stored_record() {
    let (app, _) = app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/users",
            json!({"name": "Ada", "email": "ada@x.com", "age": 30}),
        ))
        .await
        .unwrap();
    let created = json_body(response.into_body()).await;
    let id = created["user"]["id"].as_i64().unwrap();

    let response = app.oneshot(get(&format!("/users/{}", id))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(
        body,
        json!({"user": {"id": id, "name": "Ada", "email": "ada@x.com", "age": 30}})
    );
}

#[tokio::test]
async fn get_of_a_never_created_id_returns_404() {
    let (app, _) = app();

    let response = app.oneshot(get("/users/42")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response.into_body()).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_overwrites_every_field() {
    let (app, repo) = app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/users",
            json!({"name": "Ada", "email": "ada@x.com", "age": 30}),
        ))
        .await
        .unwrap();
    let created = json_body(response.into_body()).await;
    let id = created["user"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(put_json(
            &format!("/users/{}", id),
            json!({"name": "Ada King", "email": "ada@lovelace.dev", "age": 36}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert!(body["message"].is_string());

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Ada King");
    assert_eq!(stored.email, "ada@lovelace.dev");
    assert_eq!(stored.age, 36);
}

#[tokio::test]
async fn update_of_an_absent_id_still_returns_200() {
    let (app, _) = app();

    let response = app
        .oneshot(put_json(
            "/users/42",
            json!({"name": "Ghost", "email": "ghost@x.com", "age": 0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_with_malformed_body_returns_400_and_never_touches_the_store() {
    let (app, repo) = app();

    let created = repo
        .create(user_api::domain::UserPayload {
            name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            age: 30,
        })
        .await
        .unwrap();

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/users/{}", created.id))
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The record is untouched
    let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Ada");
}

#[tokio::test]
async fn update_to_a_taken_email_returns_409() {
    let (app, _) = app();

    for (name, email) in [("Ada", "ada@x.com"), ("Grace", "grace@x.com")] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/users",
                json!({"name": name, "email": email, "age": 30}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(put_json(
            "/users/2",
            json!({"name": "Grace", "email": "ada@x.com", "age": 45}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn delete_then_get_returns_404() {
    let (app, _) = app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/users",
            json!({"name": "Ada", "email": "ada@x.com", "age": 30}),
        ))
        .await
        .unwrap();
    let created = json_body(response.into_body()).await;
    let id = created["user"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(delete(&format!("/users/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get(&format!("/users/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_of_an_absent_id_returns_200() {
    let (app, _) = app();

    let response = app.oneshot(delete("/users/42")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn delete_with_non_numeric_id_returns_400() {
    let (app, _) = app();

    let response = app.oneshot(delete("/users/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_on_an_empty_store_returns_200_with_an_empty_array() {
    let (app, _) = app();

    let response = app.oneshot(get("/users")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body, json!({"users": []}));
}

#[tokio::test]
async fn list_returns_every_record() {
    let (app, _) = app();

    for (name, email) in [("Ada", "ada@x.com"), ("Grace", "grace@x.com")] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/users",
                json!({"name": name, "email": email, "age": 30}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get("/users")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["name"], "Ada");
    assert_eq!(users[1]["name"], "Grace");
}
