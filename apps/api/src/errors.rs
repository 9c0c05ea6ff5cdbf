use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::index::IndexError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Unrecognized classifier labels are deliberately absent here: the decision
/// policy tolerates them and degrades to rejection instead of erroring.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Empty document: {0}")]
    EmptyDocument(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Job description fetch failed: {0}")]
    JdFetch(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::UnsupportedFormat(msg) => {
                (StatusCode::BAD_REQUEST, "INPUT_FORMAT_ERROR", msg.clone())
            }
            AppError::EmptyDocument(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_CONTENT_ERROR",
                msg.clone(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::JdFetch(msg) => (StatusCode::BAD_REQUEST, "JD_FETCH_ERROR", msg.clone()),
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Index(e) => {
                tracing::error!("Index error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INDEX_ERROR",
                    "A retrieval error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
