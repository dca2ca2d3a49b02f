use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM model invocation.
///
/// Contains both general and provider-specific parameters. One config maps
/// to one cached HTTP client inside
/// [`crate::service_profiles::LlmServiceProfiles`].
#[derive(Debug, Clone)]
pub struct LlmModelConfig {
    /// The LLM provider/backend (OpenAI or Ollama).
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"gpt-4o"`, `"qwen3:32b"`).
    pub model: String,

    /// Inference endpoint (remote API URL or local server).
    pub endpoint: String,

    /// Optional API key for authentication (required by OpenAI).
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 = deterministic).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
