//! Shared state for all HTTP handlers.
//!
//! Everything here is constructed exactly once at process start and shared
//! behind an `Arc`: the LLM profiles cache their HTTP clients, the plan
//! store owns the connection pool, and the pipeline config is plain data.
//! Handlers never rebuild clients per request.

use std::sync::Arc;

use llm_service::{LlmServiceProfiles, config::default_config};
use plan_store::PlanStore;
use qa_pipeline::PipelineConfig;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// LLM client facade (fast profile drafts SQL, slow profile summarizes).
    pub llm: Arc<LlmServiceProfiles>,
    /// Read-only access to the plan table.
    pub plans: PlanStore,
    /// Pipeline knobs (mode, budgets, debug flag).
    pub pipeline: PipelineConfig,
}

impl AppState {
    /// Load shared state from environment variables, connecting eagerly so
    /// misconfiguration fails at startup rather than on the first request.
    pub async fn from_env() -> Result<Self, AppError> {
        let fast = default_config::config_fast()?;
        let slow = default_config::config_slow()?;
        let llm = Arc::new(LlmServiceProfiles::new(fast, Some(slow), Some(5))?);

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| AppError::MissingEnv("DATABASE_URL"))?;
        let adhoc_enabled = std::env::var("PLAN_ADHOC_SQL")
            .map(|v| v.trim().to_ascii_lowercase() != "false")
            .unwrap_or(true);
        let plans = PlanStore::connect(&database_url, adhoc_enabled).await?;

        Ok(Self {
            llm,
            plans,
            pipeline: PipelineConfig::from_env(),
        })
    }
}
