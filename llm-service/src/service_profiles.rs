//! Shared LLM service with two active profiles: `fast` and `slow`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//! - `fast` is tuned for deterministic drafting (query generation), `slow`
//!   for quality output (summaries, agent turns). If `slow` is not
//!   provided, it falls back to `fast`.

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use tokio::sync::RwLock;

use crate::{
    chat::{ChatMessage, ChatTurn, ToolSpec},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::LlmServiceError,
    health_service::{HealthService, HealthStatus},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Shared service that manages two logical LLM profiles: **fast** and
/// **slow**.
///
/// Internally caches OpenAI/Ollama clients keyed by their configuration to
/// avoid recreating HTTP clients on each call.
pub struct LlmServiceProfiles {
    fast: LlmModelConfig,
    slow: LlmModelConfig,

    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates a new service with both profiles.
    ///
    /// - `fast`: required deterministic profile (query drafting).
    /// - `slow_opt`: optional quality profile. If `None`, falls back to `fast`.
    /// - `health_timeout_secs`: optional timeout for the health checker.
    pub fn new(
        fast: LlmModelConfig,
        slow_opt: Option<LlmModelConfig>,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, LlmServiceError> {
        let slow = slow_opt.unwrap_or_else(|| fast.clone());

        Ok(Self {
            fast,
            slow,
            openai: RwLock::new(HashMap::new()),
            ollama: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Generates text using the **fast** profile.
    ///
    /// # Errors
    /// Returns [`LlmServiceError`] if generation fails.
    pub async fn generate_fast(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, LlmServiceError> {
        self.generate_with(&self.fast, prompt, system).await
    }

    /// Generates text using the **slow** profile.
    pub async fn generate_slow(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, LlmServiceError> {
        self.generate_with(&self.slow, prompt, system).await
    }

    /// One chat round with tool support using the **slow** profile.
    pub async fn chat_slow(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatTurn, LlmServiceError> {
        match self.slow.provider {
            LlmProvider::OpenAi => {
                self.openai_client(&self.slow)
                    .await?
                    .chat(messages, tools)
                    .await
            }
            LlmProvider::Ollama => {
                self.ollama_client(&self.slow)
                    .await?
                    .chat(messages, tools)
                    .await
            }
        }
    }

    /// Health of every distinct profile config (fast and slow collapse into
    /// one entry when they share a client).
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(2);
        out.push(self.health.check(&self.fast).await);
        if ClientKey::of(&self.slow) != ClientKey::of(&self.fast) {
            out.push(self.health.check(&self.slow).await);
        }
        out
    }

    async fn generate_with(
        &self,
        cfg: &LlmModelConfig,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, LlmServiceError> {
        match cfg.provider {
            LlmProvider::OpenAi => self.openai_client(cfg).await?.generate(prompt, system).await,
            LlmProvider::Ollama => self.ollama_client(cfg).await?.generate(prompt, system).await,
        }
    }

    async fn openai_client(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OpenAiService>, LlmServiceError> {
        let key = ClientKey::of(cfg);
        if let Some(client) = self.openai.read().await.get(&key) {
            return Ok(client.clone());
        }
        let mut cache = self.openai.write().await;
        if let Some(client) = cache.get(&key) {
            return Ok(client.clone());
        }
        let client = Arc::new(OpenAiService::new(cfg.clone())?);
        cache.insert(key, client.clone());
        Ok(client)
    }

    async fn ollama_client(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OllamaService>, LlmServiceError> {
        let key = ClientKey::of(cfg);
        if let Some(client) = self.ollama.read().await.get(&key) {
            return Ok(client.clone());
        }
        let mut cache = self.ollama.write().await;
        if let Some(client) = cache.get(&key) {
            return Ok(client.clone());
        }
        let client = Arc::new(OllamaService::new(cfg.clone())?);
        cache.insert(key, client.clone());
        Ok(client)
    }
}

/// Cache key derived from the parts of a config that shape the HTTP client
/// and request defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ClientKey(u64);

impl ClientKey {
    fn of(cfg: &LlmModelConfig) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        cfg.provider.hash_discriminant(&mut hasher);
        cfg.model.hash(&mut hasher);
        cfg.endpoint.hash(&mut hasher);
        cfg.api_key.hash(&mut hasher);
        cfg.max_tokens.hash(&mut hasher);
        cfg.temperature.map(f32::to_bits).hash(&mut hasher);
        cfg.top_p.map(f32::to_bits).hash(&mut hasher);
        cfg.timeout_secs.hash(&mut hasher);
        ClientKey(hasher.finish())
    }
}

impl LlmProvider {
    fn hash_discriminant<H: Hasher>(self, hasher: &mut H) {
        (self as u8).hash(hasher);
    }
}
