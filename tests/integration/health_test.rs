//! Integration tests for the plain HTTP surface.

use axum::http::StatusCode;

use crate::helpers::{TestApp, TestServer};

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(response.body["data"]["connections"], 0);
    assert_eq!(response.body["data"]["metrics"]["events_received"], 0);
}

#[tokio::test]
async fn test_health_reports_live_sessions() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.join("Alice", "r1").await;
    bob.join("Bob", "r2").await;

    let app = TestApp::from_state(server.state.clone());
    let response = app.request("GET", "/api/health").await;

    let data = &response.body["data"];
    assert_eq!(data["connections"], 2);
    assert_eq!(data["sessions"], 2);
    assert_eq!(data["rooms"], 2);
    assert_eq!(data["metrics"]["connections_total"], 2);
    assert_eq!(data["metrics"]["events_received"], 2);
}

#[tokio::test]
async fn test_health_after_shutdown() {
    let app = TestApp::new();
    app.state.realtime.shutdown();

    let response = app.request("GET", "/api/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "shutting_down");
}

#[tokio::test]
async fn test_static_index_is_served() {
    let app = TestApp::new();

    let response = app.request("GET", "/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("text/html"))
    );
    assert!(response.text.contains("<title>ChatRelay</title>"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = TestApp::new();

    let response = app.request("GET", "/no-such-file.txt").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ws_requires_upgrade() {
    let app = TestApp::new();

    let response = app.request("GET", "/ws").await;

    assert!(
        response.status.is_client_error(),
        "Expected a 4xx without upgrade headers, got {}",
        response.status
    );
}
