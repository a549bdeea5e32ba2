//! HTTP integration tests for owner records and address assignments

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use building_monitor::config::{database, AppConfig};
use building_monitor::state::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

async fn test_app() -> Router {
    let root = std::env::temp_dir().join(format!("bm_owner_test_{}", Uuid::new_v4()));
    let data_dir = root.join("data");
    std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");

    let config = AppConfig {
        server_port: 0,
        config_dir: root.join("config"),
        data_dir: data_dir.clone(),
        log_dir: root.join("logs"),
        database_url: format!("sqlite://{}?mode=rwc", data_dir.join("test.db").display()),
        bis_base_url: "http://127.0.0.1:9".to_string(),
        open_data_base_url: "http://127.0.0.1:9".to_string(),
        schema_update: true,
        run_once: true,
    };

    let db = database::establish_connection(&config.database_url, true)
        .await
        .expect("Failed to connect to test database");
    let state = AppState::new(db, config);
    state.files.ensure_dir().expect("Failed to create config dir");
    building_monitor::app(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

async fn create_owner(app: &Router, name: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/owners",
            json!({
                "name": name,
                "email": "owner@example.com",
                "discordWebhook": "https://discord.com/api/webhooks/1/abc"
            }),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["result"]["id"].as_i64().expect("Owner id in response")
}

#[tokio::test]
async fn should_create_owner_with_default_schedule() {
    // Arrange
    let app = test_app().await;

    // Act
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/owners",
            json!({"name": "Alice"}),
        ))
        .await
        .expect("Request failed");

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["name"], "Alice");
    assert_eq!(body["result"]["schedule"], json!([8, 12, 20]));
    assert_eq!(body["result"]["hasDiscordWebhook"], false);
}

#[tokio::test]
async fn should_never_echo_webhook_url_back() {
    // Arrange
    let app = test_app().await;
    create_owner(&app, "Alice").await;

    // Act
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/owners")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Request failed");

    // Assert
    let body = body_json(response).await;
    let owner = &body["result"]["owners"][0];
    assert_eq!(owner["hasDiscordWebhook"], true);
    assert!(owner.get("discordWebhook").is_none());
}

#[tokio::test]
async fn should_reject_invalid_owner_email() {
    // Arrange
    let app = test_app().await;

    // Act
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/owners",
            json!({"name": "Alice", "email": "not-an-email"}),
        ))
        .await
        .expect("Request failed");

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_update_owner_schedule() {
    // Arrange
    let app = test_app().await;
    let id = create_owner(&app, "Alice").await;

    // Act
    let response = app
        .oneshot(json_request(
            Method::PATCH,
            &format!("/api/v1/owners/{}", id),
            json!({"schedule": [6, 18]}),
        ))
        .await
        .expect("Request failed");

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["schedule"], json!([6, 18]));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_owner() {
    // Arrange
    let app = test_app().await;

    // Act
    let response = app
        .oneshot(json_request(
            Method::PATCH,
            "/api/v1/owners/999",
            json!({"name": "Nobody"}),
        ))
        .await
        .expect("Request failed");

    // Assert
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_assign_and_unassign_address() {
    // Arrange
    let app = test_app().await;
    let id = create_owner(&app, "Alice").await;
    let address = "952A Greene Ave, Brooklyn, NY 11221";

    // Act: assign
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/owners/{}/addresses", id),
            json!({"address": address}),
        ))
        .await
        .expect("Request failed");

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["addresses"], json!([address]));

    // Act: assigning twice is a no-op
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/owners/{}/addresses", id),
            json!({"address": address}),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["addresses"], json!([address]));

    // Act: unassign
    let response = app
        .clone()
        .oneshot(json_request(
            Method::DELETE,
            &format!("/api/v1/owners/{}/addresses", id),
            json!({"address": address}),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["addresses"], json!([]));

    // Act & Assert: unassigning again is a 404
    let response = app
        .oneshot(json_request(
            Method::DELETE,
            &format!("/api/v1/owners/{}/addresses", id),
            json!({"address": address}),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_reject_assignment_to_unknown_owner() {
    // Arrange
    let app = test_app().await;

    // Act
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/owners/42/addresses",
            json!({"address": "952A Greene Ave, Brooklyn, NY 11221"}),
        ))
        .await
        .expect("Request failed");

    // Assert
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
