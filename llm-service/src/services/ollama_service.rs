//! Lightweight Ollama service for non-streaming chat.
//!
//! Thin client for the local Ollama API:
//! - `POST {endpoint}/api/chat` — synchronous chat (`stream=false`), with
//!   optional tool declarations
//!
//! Uses the universal configuration [`LlmModelConfig`] and ensures that the
//! selected provider is [`LlmProvider::Ollama`]. Responses are normalized
//! into the same [`ChatTurn`] shape the OpenAI client produces; Ollama does
//! not assign tool-call ids, so synthetic ones are generated per turn.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::{
    chat::{ChatMessage, ChatTurn, ToolCall, ToolSpec},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        HttpError, LlmServiceError, Provider, ProviderError, ProviderErrorKind, make_snippet,
    },
};

/// Thin client for Ollama.
///
/// Initialized with a full [`LlmModelConfig`]. Reuses an HTTP client with a
/// configurable timeout.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::InvalidProvider`] if `cfg.provider` is not Ollama
    /// - [`ProviderErrorKind::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`LlmServiceError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, LlmServiceError> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(
                ProviderError::new(Provider::Ollama, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let url_chat = format!("{}/api/chat", endpoint.trim_end_matches('/'));

        info!(
            provider = ?cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            "OllamaService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// Non-streaming chat for one `(system, user)` prompt pair.
    ///
    /// # Errors
    /// Same as [`OllamaService::chat`], plus
    /// [`ProviderErrorKind::EmptyChoices`] if the model returned no text.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmServiceError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system {
            messages.push(ChatMessage::system(sys));
        }
        messages.push(ChatMessage::user(prompt));

        let turn = self.chat(&messages, &[]).await?;
        turn.content.ok_or_else(|| {
            ProviderError::new(Provider::Ollama, ProviderErrorKind::EmptyChoices).into()
        })
    }

    /// One chat round over a full message history with optional tools.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::HttpStatus`] for non-2xx responses
    /// - [`LlmServiceError::HttpTransport`] for client/network failures
    /// - [`ProviderErrorKind::Decode`] if the JSON cannot be parsed
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatTurn, LlmServiceError> {
        let started = Instant::now();
        let body = OllamaChatRequest::from_cfg(&self.cfg, messages, tools);

        debug!(
            model = %self.cfg.model,
            endpoint = %self.cfg.endpoint,
            messages = messages.len(),
            tools = tools.len(),
            "POST {}", self.url_chat
        );

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Ollama /api/chat returned non-success status"
            );

            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: OllamaChatResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode /api/chat response"
                );
                return Err(ProviderError::new(
                    Provider::Ollama,
                    ProviderErrorKind::Decode(format!("serde error: {e}; expected `message`")),
                )
                .into());
            }
        };

        let message = out.message.unwrap_or_default();
        let tool_calls = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, c)| ToolCall {
                // Ollama assigns no call ids; synthesize stable ones per turn.
                id: format!("call-{i}"),
                name: c.function.name,
                arguments: c.function.arguments,
            })
            .collect();

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "chat completed"
        );

        Ok(ChatTurn::new(message.content, tool_calls))
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireToolSpec<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<WireOptions>,
}

impl<'a> OllamaChatRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, messages: &'a [ChatMessage], tools: &'a [ToolSpec]) -> Self {
        let options = if cfg.temperature.is_some() || cfg.top_p.is_some() || cfg.max_tokens.is_some()
        {
            Some(WireOptions {
                temperature: cfg.temperature,
                top_p: cfg.top_p,
                num_predict: cfg.max_tokens,
            })
        } else {
            None
        };

        Self {
            model: &cfg.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            stream: false,
            tools: tools.iter().map(WireToolSpec::from).collect(),
            options,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for WireMessage<'a> {
    fn from(m: &'a ChatMessage) -> Self {
        // Ollama has no tool_call_id on tool results and no structured
        // assistant tool-call replay; text content carries everything.
        Self {
            role: m.role,
            content: m.content.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Serialize)]
struct WireToolSpec<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionSpec<'a>,
}

impl<'a> From<&'a ToolSpec> for WireToolSpec<'a> {
    fn from(t: &'a ToolSpec) -> Self {
        Self {
            kind: "function",
            function: WireFunctionSpec {
                name: t.name,
                description: t.description,
                parameters: &t.parameters,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct WireFunctionSpec<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<MessageIn>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageIn {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCallIn>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallIn {
    function: FunctionIn,
}

#[derive(Debug, Deserialize)]
struct FunctionIn {
    name: String,
    /// Ollama ships arguments as a decoded JSON object.
    arguments: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_tool_calls_get_synthetic_ids() {
        let raw = r#"{
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [
                    {"function": {"name": "run_read_only_query", "arguments": {"sql": "SELECT 1"}}}
                ]
            }
        }"#;
        let out: OllamaChatResponse = serde_json::from_str(raw).unwrap();
        let message = out.message.unwrap();
        let calls = message.tool_calls.unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.name, "run_read_only_query");
        assert_eq!(calls[0].function.arguments["sql"], "SELECT 1");
    }
}
