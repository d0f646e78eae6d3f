//! The JSON error document returned by every endpoint.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;

/// Error response body.
///
/// ```json
/// {"status":"CONFLICT","reason":"Conflict","message":"...","timestamp":"2024-01-01 12:00:00"}
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Status name in upper snake case, e.g. `NOT_FOUND`.
    pub status: String,
    /// Canonical reason phrase, e.g. `Not Found`.
    pub reason: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorBody {
    /// Builds a body for `status` stamped with the current time.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let reason = status.canonical_reason().unwrap_or("Unknown");
        Self {
            status: reason.to_uppercase().replace([' ', '-'], "_"),
            reason: reason.to_string(),
            message: message.into(),
            timestamp: ewm_types::datetime::format(&ewm_types::datetime::now()),
        }
    }
}

/// Renders an error response with the standard body.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(status, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        assert_eq!(ErrorBody::new(StatusCode::CONFLICT, "x").status, "CONFLICT");
        let body = ErrorBody::new(StatusCode::NOT_FOUND, "Event with id=3 was not found");
        assert_eq!(body.status, "NOT_FOUND");
        assert_eq!(body.reason, "Not Found");
        assert_eq!(body.timestamp.len(), "2024-01-01 00:00:00".len());
        assert_eq!(
            ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, "").status,
            "INTERNAL_SERVER_ERROR"
        );
    }
}
