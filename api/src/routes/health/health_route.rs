//! GET /health — liveness plus LLM provider reachability.

use std::sync::Arc;

use axum::{Json, extract::State};
use llm_service::HealthStatus;
use serde::Serialize;

use crate::core::app_state::AppState;

/// Response payload for /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"` when every probed provider is reachable, `"degraded"` otherwise.
    pub status: &'static str,
    pub llm: Vec<HealthStatus>,
}

/// Handler: GET /health
///
/// Always answers 200; a broken provider shows up in the body, not the
/// status code, so load balancers keep routing while operators look.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let llm = state.llm.health_all().await;
    let status = if llm.iter().all(|s| s.reachable) {
        "ok"
    } else {
        "degraded"
    };
    Json(HealthResponse { status, llm })
}
