use serde::Serialize;

/// Represents the provider (backend) used for LLM inference.
///
/// The analyst backend talks to a remote OpenAI-compatible API in
/// production and to a local Ollama runtime in development; both implement
/// the same `generate`/`chat` surface.
///
/// Adding more providers in the future (e.g., Anthropic Claude, Mistral
/// API) can be done by extending this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI chat completions API.
    OpenAi,
    /// Local Ollama runtime.
    Ollama,
}
