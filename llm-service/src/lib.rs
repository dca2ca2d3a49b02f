//! Shared LLM client library for the plan analyst backend.
//!
//! Provides thin, non-streaming clients for two providers (OpenAI and
//! Ollama) behind one configuration type, plus:
//!
//! - [`service_profiles::LlmServiceProfiles`] — a process-wide facade with
//!   two logical profiles, **fast** (deterministic drafting) and **slow**
//!   (quality summarization), caching HTTP clients per configuration.
//! - [`chat`] — provider-neutral chat message and tool-call types.
//! - [`error_handler`] — unified error taxonomy for config, provider, and
//!   transport failures.
//! - [`health_service`] — per-provider reachability checks.
//! - [`telemetry`] — a crate-scoped `tracing` fmt layer for composition in
//!   the host binary.

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use chat::{ChatMessage, ChatTurn, ToolCall, ToolSpec};
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{LlmServiceError, Result};
pub use health_service::HealthStatus;
pub use service_profiles::LlmServiceProfiles;
