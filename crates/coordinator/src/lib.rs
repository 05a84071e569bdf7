//! Coordinator binary support modules, exposed as a library so integration
//! tests can build the same [`axum::Router`] the binary serves.

pub mod auth;
pub mod config;
pub mod notebook;
pub mod routes;
pub mod state;
pub mod ws;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use fabric_core::SystemClock;
use fabric_engine::Engine;
use fabric_registry::Registry;
use fabric_sandbox::SandboxBackend;
use fabric_signaling::SignalingPlane;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::AppState;

pub fn build_state(config: &Config, backend: Arc<dyn SandboxBackend>, gpu_available: bool) -> (AppState, tokio::sync::mpsc::UnboundedReceiver<fabric_core::Event>) {
    let registry = Arc::new(
        Registry::new(SystemClock, config.liveness_timeout_ms)
            .with_snapshot_path(config.state_dir.join("registry-snapshot.json")),
    );
    let signaling = Arc::new(SignalingPlane::new(SystemClock));
    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
    let engine = Engine::new(SystemClock, backend, config.state_dir.join("jobs"), gpu_available).with_event_sink(event_tx);

    let state = AppState::new(
        registry,
        signaling,
        engine,
        config.auth_token.clone(),
        config.liveness_timeout_ms,
        config.state_dir.join("uploads"),
    );
    (state, event_rx)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::health))
        .route("/workers", get(routes::workers))
        .route("/capacity", get(routes::capacity))
        .route("/submit", post(routes::submit))
        .route("/upload", post(routes::upload))
        .route("/status/:job_id", get(routes::status))
        .route("/artifact/:job_id/:name", get(routes::artifact))
        .route("/session", post(routes::create_session))
        .route("/session/:session_id/exec", post(routes::session_exec))
        .route("/session/:session_id/restart", post(routes::session_restart))
        .route("/ws", get(ws::handler))
        .layer(axum::middleware::from_fn_with_state(state.clone(), auth::require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
