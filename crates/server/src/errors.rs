use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// JSON error response in the shape the API promises: a `message` field
/// carrying either a string or, for validation failures, the list of
/// per-field messages. Internals never leak into the body.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self { status, body: serde_json::json!({ "message": message }) }
    }

    pub fn validation(messages: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: serde_json::json!({ "message": messages }),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
