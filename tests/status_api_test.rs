//! HTTP integration tests for the status and complaints read endpoints

use axum::{body::Body, http::Request, Router};
use building_monitor::config::{database, AppConfig};
use building_monitor::domain::complaint::service::ComplaintService;
use building_monitor::domain::status::service::StatusService;
use building_monitor::scrape::bis::BisSummary;
use building_monitor::scrape::open_data::Complaint311Record;
use building_monitor::state::AppState;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

const ADDRESS: &str = "952A Greene Ave, Brooklyn, NY 11221";

async fn test_app() -> (Router, AppState) {
    let root = std::env::temp_dir().join(format!("bm_status_test_{}", Uuid::new_v4()));
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
    (building_monitor::app(state.clone()), state)
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed");
    assert!(response.status().is_success(), "GET {} failed", uri);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

#[tokio::test]
async fn should_list_stored_snapshots() {
    // Arrange
    let (app, state) = test_app().await;
    let summary = BisSummary {
        complaints: 4,
        dob_violations: 2,
        ecb_violations: 7,
    };
    StatusService::upsert_snapshot(&state.db, ADDRESS, &summary, Utc::now().naive_utc())
        .await
        .expect("Upsert failed");
    StatusService::set_bin(&state.db, ADDRESS, "3039851")
        .await
        .expect("Failed to store BIN");

    // Act
    let body = get_json(&app, "/api/v1/status").await;

    // Assert
    let statuses = body["result"]["statuses"]
        .as_array()
        .expect("statuses array");
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0]["address"], ADDRESS);
    assert_eq!(statuses[0]["bin"], "3039851");
    assert_eq!(statuses[0]["complaints"], 4);
    assert_eq!(statuses[0]["dobViolations"], 2);
    assert_eq!(statuses[0]["ecbViolations"], 7);
    assert!(statuses[0]["lastChecked"].is_string());
}

#[tokio::test]
async fn should_list_stored_complaints_for_address() {
    // Arrange
    let (app, state) = test_app().await;
    let record = Complaint311Record {
        incident_id: Some("NYC311-7".to_string()),
        complaint_type: Some("Noise".to_string()),
        created_date: Some("2026-08-01T09:00:00.000".to_string()),
        status: Some("Open".to_string()),
        ..Default::default()
    };
    ComplaintService::insert_complaint(&state.db, ADDRESS, &record)
        .await
        .expect("Insert failed");

    // Act
    let body = get_json(
        &app,
        "/api/v1/complaints?address=952A%20Greene%20Ave,%20Brooklyn,%20NY%2011221",
    )
    .await;

    // Assert
    let complaints = body["result"]["complaints"]
        .as_array()
        .expect("complaints array");
    assert_eq!(complaints.len(), 1);
    assert_eq!(complaints[0]["incidentId"], "NYC311-7");
    assert_eq!(complaints[0]["complaintType"], "Noise");
}

#[tokio::test]
async fn should_return_not_found_for_violations_without_bin() {
    // Arrange
    let (app, _state) = test_app().await;

    // Act
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/violations?address=952A%20Greene%20Ave,%20Brooklyn,%20NY%2011221")
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed");

    // Assert
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}
