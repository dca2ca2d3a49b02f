//! Provider reachability checks.
//!
//! A [`HealthService`] owns one short-timeout HTTP client and probes the
//! cheapest read endpoint each provider exposes:
//!
//! - OpenAI: `GET {endpoint}/v1/models`
//! - Ollama: `GET {endpoint}/api/tags`
//!
//! Checks never fail the caller; problems are reported inside
//! [`HealthStatus`] so a health route can render a degraded-but-alive view.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{LlmServiceError, make_snippet},
};

/// Outcome of probing one profile config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub provider: LlmProvider,
    pub endpoint: String,
    pub model: String,
    pub reachable: bool,
    pub latency_ms: u64,
    /// Status line or error text when unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Shared checker with a bounded probe timeout (default 5s).
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, LlmServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.unwrap_or(5)))
            .build()?;
        Ok(Self { client })
    }

    /// Probe the provider behind `cfg`. Never errors; see [`HealthStatus`].
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let base = cfg.endpoint.trim_end_matches('/');
        let url = match cfg.provider {
            LlmProvider::OpenAi => format!("{base}/v1/models"),
            LlmProvider::Ollama => format!("{base}/api/tags"),
        };

        let started = Instant::now();
        let mut req = self.client.get(&url);
        if let (LlmProvider::OpenAi, Some(key)) = (cfg.provider, cfg.api_key.as_deref()) {
            req = req.bearer_auth(key);
        }

        let (reachable, detail) = match req.send().await {
            Ok(resp) if resp.status().is_success() => (true, None),
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                (false, Some(format!("HTTP {status}: {}", make_snippet(&body))))
            }
            Err(e) => (false, Some(e.to_string())),
        };

        let latency_ms = started.elapsed().as_millis() as u64;
        debug!(provider = ?cfg.provider, %url, reachable, latency_ms, "health probe finished");

        HealthStatus {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            reachable,
            latency_ms,
            detail,
        }
    }
}
