pub mod approvals;
pub mod dashboard;
pub mod insights;
pub mod reviews;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

/// `{"error": message}` with the given status.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}
