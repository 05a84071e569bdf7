//! Coordinator binary: wires the registry, signaling plane and job engine
//! behind a REST/WebSocket surface, restores registry state from disk,
//! and runs the liveness sweep in the background.

use std::sync::Arc;

use clap::Parser;
use fabric_coordinator::config::{Args, Config};
use fabric_coordinator::{build_state, router};
use fabric_sandbox::{ContainerBackend, SandboxBackend, SubprocessBackend};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fabric_coordinator=info,tower_http=info"));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = Config::resolve(Args::parse());
    tokio::fs::create_dir_all(&config.state_dir).await?;

    let backend: Arc<dyn SandboxBackend> = match ContainerBackend::detect().await {
        Ok(backend) => {
            tracing::info!(runtime = backend.name(), "using container sandbox backend");
            Arc::new(backend)
        }
        Err(err) if config.allow_no_sandbox => {
            tracing::warn!(error = %err, "no container runtime found, falling back to unsandboxed subprocess execution");
            Arc::new(SubprocessBackend)
        }
        Err(err) => {
            anyhow::bail!("no container runtime available and --allow-no-sandbox was not set: {err}");
        }
    };

    let (state, mut event_rx) = build_state(&config, backend, false);
    state.registry.restore()?;

    let forward_events = state.events.clone();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let _ = forward_events.send(event);
        }
    });

    let sweep_token = CancellationToken::new();
    fabric_registry::spawn_sweep_task(state.registry.clone(), config.sweep_interval_ms, sweep_token.clone());

    let app = router(state);
    let addr = format!("{}:{}", config.bind_host, config.bind_port);
    tracing::info!(%addr, state_dir = %config.state_dir.display(), "coordinator listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    sweep_token.cancel();
    Ok(())
}
