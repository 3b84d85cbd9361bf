//! REST API types and error → response mapping.
//!
//! Successful results and errors are both sent as `text/plain`; only
//! `/health` answers with JSON.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::MatrixError;

/// Nginx-style "client closed request", used for cancelled requests.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Query string of `/matrix/{operation}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatrixQuery {
    /// Path of the CSV file, relative to the data directory.
    #[serde(default)]
    pub file: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub operations: Vec<String>,
}

/// Map a pipeline error to its HTTP status code.
pub fn status_for(err: &MatrixError) -> StatusCode {
    if err.is_deadline_exceeded() {
        return StatusCode::GATEWAY_TIMEOUT;
    }
    if err.is_cancelled() {
        return StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    }
    err.kind()
        .and_then(|kind| StatusCode::from_u16(kind.status_code()).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Plain-text response with an explicit content type.
pub fn text_response(status: StatusCode, body: impl Into<String>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body.into(),
    )
        .into_response()
}

impl IntoResponse for MatrixError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let body = if self.is_deadline_exceeded() {
            "request timeout".to_string()
        } else if self.is_cancelled() {
            String::new()
        } else {
            self.to_string()
        };
        text_response(status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_each_kind() {
        let cases = [
            (MatrixError::invalid_input("x"), StatusCode::BAD_REQUEST),
            (MatrixError::not_found("x"), StatusCode::NOT_FOUND),
            (MatrixError::payload_too_large("x"), StatusCode::PAYLOAD_TOO_LARGE),
            (MatrixError::unprocessable("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (MatrixError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (MatrixError::DeadlineExceeded, StatusCode::GATEWAY_TIMEOUT),
        ];
        for (err, expected) in cases {
            assert_eq!(status_for(&err), expected, "{}", err);
        }
        assert_eq!(status_for(&MatrixError::Cancelled).as_u16(), CLIENT_CLOSED_REQUEST);
    }

    #[test]
    fn test_status_through_context() {
        let err = MatrixError::unprocessable("ragged").context("operation 'sum' failed");
        assert_eq!(status_for(&err), StatusCode::UNPROCESSABLE_ENTITY);

        let err = MatrixError::DeadlineExceeded.context("reading file");
        assert_eq!(status_for(&err), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_error_response() {
        let response = MatrixError::not_found("failed to open file").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_health_response_serializes() {
        let health = HealthResponse {
            status: "ok".into(),
            service: "league-matrix".into(),
            version: "0.1.0".into(),
            operations: vec!["sum".into()],
        };
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["operations"][0], "sum");
    }
}
