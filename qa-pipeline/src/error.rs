//! Typed error for the qa-pipeline crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The question was empty or whitespace-only; maps to a client error.
    #[error("question must be a non-empty string")]
    EmptyQuestion,

    /// Errors from the LLM client layer.
    #[error("LLM error: {0}")]
    Llm(#[from] llm_service::LlmServiceError),

    /// Errors from the plan store.
    #[error("store error: {0}")]
    Store(#[from] plan_store::StoreError),

    /// The agent spent its whole iteration budget without a final answer.
    #[error("agent exhausted its budget of {0} steps without an answer")]
    StepBudgetExhausted(usize),

    /// JSON (de)serialization issues (should be rare).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// True for failures caused by the caller's input rather than by an
    /// upstream dependency.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::EmptyQuestion)
    }
}
