//! POST /api/chat — answers one plan question.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::Value;
use tracing::error;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::chat::chat_request::{ChatResponse, parse_message},
};

/// Handler: POST /api/chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/chat \
///   -H 'content-type: application/json' \
///   -d '{"message":"Which plan in Cook County has the lowest premium?"}'
/// ```
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    // Validate by hand before touching any backend: a missing field, a
    // non-string value, malformed JSON, and an empty string all answer the
    // same 400.
    let Json(body) = body?;
    let message = parse_message(&body).ok_or(AppError::InvalidMessage)?;

    let qa = qa_pipeline::answer_question(
        state.llm.as_ref(),
        &state.plans,
        &state.pipeline,
        message,
    )
    .await
    .map_err(|e| {
        error!(error = %e, "chat request failed");
        AppError::from(e)
    })?;

    Ok(Json(ChatResponse::from_answer(qa, state.pipeline.debug)))
}
