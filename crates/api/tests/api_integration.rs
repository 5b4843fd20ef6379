//! API integration tests.
//!
//! These tests drive the full router (auth middleware included) against a
//! mock database and an in-memory identity provider.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::Value;
use tower::ServiceExt;
use traversee_api::{AppState, app};
use traversee_common::{LocalStorage, SharedStorage, config::ServicesConfig};
use traversee_core::{IdentityService, RemoteServices, StaticIdentityProvider};
use traversee_db::entities::{campaign, open_trip};

const TOKEN: &str = "good-token";

fn identity() -> IdentityService {
    Arc::new(
        StaticIdentityProvider::new()
            .with_token(TOKEN, "user1")
            .with_user("user1", "Sari", None),
    )
}

fn storage() -> SharedStorage {
    let dir = std::env::temp_dir().join(format!("traversee-api-{}", std::process::id()));
    Arc::new(LocalStorage::new(dir, "http://localhost/files".to_string()))
}

fn remote_services() -> RemoteServices {
    // Nothing listens on the discard port.
    RemoteServices::new(&ServicesConfig {
        sentiment_url: "http://127.0.0.1:9".to_string(),
        recommendation_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 2,
    })
    .unwrap()
}

fn create_test_router(db: DatabaseConnection) -> Router {
    let state = AppState::new(Arc::new(db), identity(), storage(), remote_services());
    app(state)
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn authed(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_needs_no_credentials() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_credentials_returns_401() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/campaigns")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "No credentials provided.");
}

#[tokio::test]
async fn test_empty_authorization_header_is_missing_credentials() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/campaigns")
                .header(header::AUTHORIZATION, "")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "No credentials provided.");
}

#[tokio::test]
async fn test_invalid_token_returns_401() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/forums")
                .header(header::AUTHORIZATION, "Bearer forged")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Invalid token provided.");
}

#[tokio::test]
async fn test_malformed_authorization_header_returns_401() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/tourisms")
                .header(header::AUTHORIZATION, TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Invalid token provided.");
}

#[tokio::test]
async fn test_unknown_campaign_returns_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<campaign::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(authed("GET", "/api/v1/campaigns/42").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Campaign with id 42 doesn't exist");
}

#[tokio::test]
async fn test_malformed_location_filter_yields_empty_list() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<campaign::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            authed("GET", "/api/v1/campaigns?location_id=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_non_numeric_path_id_returns_400() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(authed("GET", "/api/v1/open-trips/abc").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_unknown_open_trip_returns_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<open_trip::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(authed("DELETE", "/api/v1/open-trips/7").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Open trip with id 7 doesn't exist");
}

#[tokio::test]
async fn test_open_trip_requires_all_fields() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            authed("POST", "/api/v1/open-trips")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"title": "Rinjani summit"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Please input all required data");
}

#[tokio::test]
async fn test_forum_json_requires_title_and_text() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            authed("POST", "/api/v1/forums")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"title": "Hello", "campaign_id": 3}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Title and text are required");
}

#[tokio::test]
async fn test_forum_multipart_rejects_non_image() {
    let app = create_test_router(empty_db());

    let boundary = "traverseeboundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"title\"\r\n\r\n\
         Beach cleanup\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"text\"\r\n\r\n\
         Join us on Sunday\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"image\"; filename=\"notes.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         not a picture\r\n\
         --{boundary}--\r\n"
    );

    let response = app
        .oneshot(
            authed("POST", "/api/v1/forums")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "File is not a valid image");
}

#[tokio::test]
async fn test_invalid_json_returns_400() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            authed("POST", "/api/v1/campaigns/1/submissions")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreachable_sentiment_service_returns_500() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            authed("GET", "/api/v1/analyze_sentiment?words=great")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Sentiment service is unavailable");
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            authed("GET", "/api/v1/nonexistent/endpoint")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Resource not found");
}
