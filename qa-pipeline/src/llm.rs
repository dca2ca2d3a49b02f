//! Seam between the pipeline and the LLM client layer.
//!
//! The pipeline only needs three operations, captured by [`ChatModel`] so
//! tests can script model behavior without a network. The production
//! implementation is [`llm_service::LlmServiceProfiles`].

use llm_service::{ChatMessage, ChatTurn, LlmServiceError, LlmServiceProfiles, ToolSpec};

/// What the pipeline requires from a model backend.
pub trait ChatModel: Send + Sync {
    /// Deterministic drafting completion (query generation).
    fn generate_fast(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> impl std::future::Future<Output = Result<String, LlmServiceError>> + Send;

    /// Quality completion (answer summarization).
    fn generate_slow(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> impl std::future::Future<Output = Result<String, LlmServiceError>> + Send;

    /// One tool-capable chat round (agent design).
    fn chat_slow(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> impl std::future::Future<Output = Result<ChatTurn, LlmServiceError>> + Send;
}

impl ChatModel for LlmServiceProfiles {
    async fn generate_fast(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, LlmServiceError> {
        LlmServiceProfiles::generate_fast(self, prompt, system).await
    }

    async fn generate_slow(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, LlmServiceError> {
        LlmServiceProfiles::generate_slow(self, prompt, system).await
    }

    async fn chat_slow(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatTurn, LlmServiceError> {
        LlmServiceProfiles::chat_slow(self, messages, tools).await
    }
}
