//! Public application error type and its HTTP mapping.
//!
//! The chat endpoint's wire contract is fixed: client errors answer
//! `{"error": ...}` with status 400, processing failures answer
//! `{"error": ..., "details": ...}` with status 500. Everything else in the
//! crate funnels into [`AppError`] so handlers stay `Result`-shaped.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qa_pipeline::PipelineError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("LLM configuration error: {0}")]
    LlmConfig(#[from] llm_service::LlmServiceError),

    #[error("plan store error: {0}")]
    Store(#[from] plan_store::StoreError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request handling ---
    /// Body is not `{"message": <non-empty string>}`.
    #[error("Invalid message format")]
    InvalidMessage,

    /// The pipeline failed while answering.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidMessage => StatusCode::BAD_REQUEST,
            AppError::Pipeline(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = if status == StatusCode::BAD_REQUEST {
            ErrorBody {
                error: "Invalid message format",
                details: None,
            }
        } else {
            ErrorBody {
                error: "Failed to process your request",
                details: Some(self.to_string()),
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Convert Axum body rejections (malformed JSON, wrong content type) into
/// the same 400 contract as a missing `message` field.
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(_: axum::extract::rejection::JsonRejection) -> Self {
        AppError::InvalidMessage
    }
}
