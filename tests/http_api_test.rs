use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use civic_aid_api::app::{router, AppState};
use civic_aid_api::audit::AuditPipeline;
use civic_aid_api::config::AppConfig;
use civic_aid_api::storage::memory::MemoryStore;
use civic_aid_api::storage::Store;

fn test_router() -> Router {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let audit = AuditPipeline::spawn(store.clone());
    router(AppState::new(&AppConfig::default(), store, audit))
}

fn json_request(method: &str, uri: &str, role: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(role) = role {
        builder = builder.header("x-user-role", role);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn bare_request(method: &str, uri: &str, role: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder.header("x-user-role", role);
    }
    builder.body(Body::empty()).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_is_always_available() {
    let app = test_router();

    let response = app
        .oneshot(bare_request("GET", "/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "civic-aid-api");
}

#[tokio::test]
async fn registration_returns_created_with_a_cell_id() {
    let app = test_router();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/register",
            None,
            &json!({ "name": "Alice", "role": "recipient", "lat": 37.7, "lon": -122.4 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["status"], "created");
    let cell_id = body["cell_id"].as_str().unwrap().to_string();
    assert!(!cell_id.is_empty());

    // The new user is countable through the public stats endpoint.
    let response = app
        .oneshot(bare_request(
            "GET",
            &format!("/analytics/region/{}", cell_id),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["cell_id"], cell_id.as_str());
    assert_eq!(body["total_users"], 1);
}

#[tokio::test]
async fn request_creation_is_gated_on_the_recipient_role() {
    let app = test_router();
    let payload = json!({ "description": "need water" });

    // No role header at all.
    let response = app
        .clone()
        .oneshot(json_request("POST", "/requests/create", None, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Wrong role.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/requests/create",
            Some("admin"),
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Recipient role passes.
    let response = app
        .oneshot(json_request(
            "POST",
            "/requests/create",
            Some("recipient"),
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Request submitted");
    assert!(body["request_id"].as_str().is_some());
}

#[tokio::test]
async fn verification_maps_not_found_and_forbidden() {
    let app = test_router();
    let missing = "/requests/verify/00000000-0000-0000-0000-00000000dead";

    let response = app
        .clone()
        .oneshot(bare_request("PATCH", missing, Some("recipient")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(bare_request("PATCH", missing, Some("admin")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Full path: create as recipient, verify as admin.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/requests/create",
            Some("recipient"),
            &json!({ "description": "need shelter" }),
        ))
        .await
        .unwrap();
    let request_id = response_json(response).await["request_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(bare_request(
            "PATCH",
            &format!("/requests/verify/{}", request_id),
            Some("admin"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "verified");
}

#[tokio::test]
async fn log_viewing_is_admin_only() {
    let app = test_router();

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/system/logs", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/system/logs", Some("recipient")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(bare_request("GET", "/system/logs", Some("admin")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert!(body.is_array());
}

#[tokio::test]
async fn unknown_role_tokens_are_rejected_by_every_gate() {
    let app = test_router();

    let response = app
        .oneshot(bare_request("GET", "/system/logs", Some("superuser")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
