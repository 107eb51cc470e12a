//! Health check integration tests.

mod helpers;

use axum::http::StatusCode;
use helpers::{api_path, setup_test_app};
use serde_json::Value;

#[tokio::test]
async fn test_healthcheck_reports_connected_database() {
    let app = setup_test_app().await;

    // No token required
    let response = app.client().get(&api_path("/healthcheck")).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "API is running smoothly");
    assert_eq!(body["data"]["database"], "Connected");
}

#[tokio::test]
async fn test_healthcheck_reports_unavailable_database() {
    let app = setup_test_app().await;
    app.db.set_unavailable(true);

    let response = app.client().get(&api_path("/healthcheck")).await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Database is Disconnected");
    assert_eq!(body["recoverable"], true);

    app.db.set_unavailable(false);
    app.client()
        .get(&api_path("/healthcheck"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_openapi_document_is_public() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(vidshare_api::constants::OPENAPI_PATH)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["info"]["title"], "Vidshare API");
    assert!(body["paths"]["/api/v1/videos"].is_object());
}
