//! Success envelope
//!
//! Every successful response is `{status, data, message, success}` with the
//! HTTP status repeated in the body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

/// Serializes as `{}`, for operations with nothing to return.
#[derive(Debug, Default, Clone, Copy, Serialize, ToSchema)]
pub struct Empty {}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            data,
            message: message.into(),
            success: status.as_u16() < 400,
        }
    }

    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, data, message)
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, data, message)
    }
}

impl ApiResponse<Empty> {
    pub fn empty(message: impl Into<String>) -> Self {
        Self::ok(Empty {}, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_tracks_status() {
        let created = ApiResponse::created(vec![1, 2], "Created");
        assert_eq!(created.status, 201);
        assert!(created.success);

        let json = serde_json::to_value(ApiResponse::empty("Nothing to update")).unwrap();
        assert_eq!(json["data"], serde_json::json!({}));
        assert_eq!(json["status"], 200);
        assert_eq!(json["success"], true);
    }
}
