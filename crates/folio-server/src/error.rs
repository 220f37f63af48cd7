//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Note not found by id.
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// Group not found by name.
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// No quote matched the request.
    #[error("No quotes found")]
    NoQuotes(Option<String>),

    /// Request parameters or body failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unexpected server-side failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::NoteNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Note not found", "id": id}),
            ),
            Self::GroupNotFound(group) => (
                StatusCode::NOT_FOUND,
                json!({"error": format!("Group not found: {group}")}),
            ),
            Self::NoQuotes(category) => (
                StatusCode::NOT_FOUND,
                json!({"error": match category {
                    Some(category) => format!("No quotes found in category: {category}"),
                    None => "No quotes found".to_owned(),
                }}),
            ),
            Self::Validation(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"error": message}),
            ),
            Self::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal server error"}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
