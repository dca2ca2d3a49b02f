//! HTTP surface for the plan analyst backend.
//!
//! One chat endpoint plus a health probe, wired over shared state that is
//! built once at startup. The access gate middleware wraps everything under
//! `/api` but is currently an intentional pass-through.

use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::access_gate::access_gate,
    routes::{chat::chat_route::chat, health::health_route::health},
};

/// Build and run the server until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").map_err(|_| AppError::MissingEnv("API_ADDRESS"))?;

    let state = Arc::new(AppState::from_env().await?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    tracing::info!(%host_url, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Assemble the router over shared state. Public so tests can drive the
/// full stack in-process.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health))
        .layer(middleware::from_fn(access_gate))
        .with_state(state)
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
