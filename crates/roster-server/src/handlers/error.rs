//! Mapping of store and maintainer errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::RosterError;
use serde_json::json;

/// Error response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl From<RosterError> for ApiError {
    fn from(e: RosterError) -> Self {
        // Every write-path failure is a 400; there is no 5xx class
        let status = match e {
            RosterError::NotFound { .. } => StatusCode::NOT_FOUND,
            RosterError::Validation(_)
            | RosterError::InvalidFilter(_)
            | RosterError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            code: e.code(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!("Request failed with {}: {}", self.status, self.message);
        let body = Json(json!({
            "error": self.message,
            "code": self.code,
        }));
        (self.status, body).into_response()
    }
}
