//! Typed error kinds for the HTTP surface.
//!
//! Every user-visible failure is a JSON object `{"success": false, "error": ...}`,
//! never a bare stack trace. Store failures keep their details in the body so
//! the cron caller can decide to retry the whole run.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum AppError {
    /// Caller-supplied input violates a precondition (empty topic, bad body).
    Validation(String),
    /// Referenced entity (backlog item, cached quiz) does not exist.
    NotFound(String),
    /// Cron secret mismatch.
    Unauthorized(&'static str),
    /// Cache store read/write failed. Always fatal to the current operation.
    Store(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "success": false, "error": msg })),
            )
                .into_response(),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "success": false, "error": msg })),
            )
                .into_response(),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "success": false, "error": msg })),
            )
                .into_response(),
            AppError::Store(err) => {
                tracing::error!(target: "quiz_backend", error = ?err, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "success": false,
                        "error": "Store operation failed",
                        "details": err.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Store(err.into())
    }
}
