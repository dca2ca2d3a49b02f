//! Default LLM configs loaded strictly from environment variables.
//!
//! Two roles are used by the question-answering pipeline:
//!
//! - **Fast** → deterministic drafting (SQL generation); temperature 0.0
//! - **Slow** → quality answer summarization; temperature 0.2
//!
//! Both roles share one provider selected by `LLM_KIND`.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`       = provider kind (`openai` default, or `ollama`)
//! - `LLM_MAX_TOKENS` = optional max tokens (u32)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY` = API key (mandatory)
//! - `OPENAI_MODEL`   = model name (default `gpt-4o`)
//! - `OPENAI_URL`     = API base (default `https://api.openai.com`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = model name (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, Result, env_opt_u32, must_env},
};

/// Config for the **fast/deterministic** role (query drafting).
pub fn config_fast() -> Result<LlmModelConfig> {
    config_for(provider_kind()?, 0.0)
}

/// Config for the **slow/quality** role (answer summarization, agent turns).
pub fn config_slow() -> Result<LlmModelConfig> {
    config_for(provider_kind()?, 0.2)
}

/// Resolves the provider from `LLM_KIND` (`openai` when unset).
fn provider_kind() -> Result<LlmProvider> {
    let kind = std::env::var("LLM_KIND").unwrap_or_else(|_| "openai".into());
    match kind.trim().to_ascii_lowercase().as_str() {
        "openai" => Ok(LlmProvider::OpenAi),
        "ollama" => Ok(LlmProvider::Ollama),
        other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
    }
}

fn config_for(provider: LlmProvider, temperature: f32) -> Result<LlmModelConfig> {
    match provider {
        LlmProvider::OpenAi => config_openai(temperature),
        LlmProvider::Ollama => config_ollama(temperature),
    }
}

fn config_openai(temperature: f32) -> Result<LlmModelConfig> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".into());
    let endpoint =
        std::env::var("OPENAI_URL").unwrap_or_else(|_| "https://api.openai.com".into());
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAi,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(60),
    })
}

fn config_ollama(temperature: f32) -> Result<LlmModelConfig> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("OLLAMA_MODEL")?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens,
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(600),
    })
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint() -> Result<String> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}
