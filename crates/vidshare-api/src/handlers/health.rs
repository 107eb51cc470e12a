//! Health check handler

use crate::error::ErrorResponse;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub database: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/healthcheck",
    tag = "health",
    responses(
        (status = 200, description = "API and database are up", body = Object),
        (status = 503, description = "Database unreachable", body = ErrorResponse)
    )
)]
pub async fn healthcheck(State(state): State<Arc<AppState>>) -> Response {
    let status = match tokio::time::timeout(PING_TIMEOUT, state.repos.health.ping()).await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e.to_string()),
        Err(_) => Some("timeout".to_string()),
    };

    match status {
        None => ApiResponse::ok(
            HealthStatus {
                database: "Connected".to_string(),
            },
            "API is running smoothly",
        )
        .into_response(),
        Some(error) => {
            tracing::warn!(error = %error, "Health check failed");
            ErrorResponse::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "Database is Disconnected",
                "SERVICE_UNAVAILABLE",
            )
            .retriable("Retry after a short delay")
            .into_response()
        }
    }
}
