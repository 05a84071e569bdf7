//! Worker binary: advertises capabilities to the coordinator, answers
//! signaling offers, and executes jobs delivered over the direct
//! peer-to-peer data channel in its own sandbox.

mod config;
mod data_channel;
mod protocol;
mod signaling_link;

use std::sync::Arc;

use clap::Parser;
use config::{Args, Config};
use fabric_core::{SystemClock, WorkerDescriptor, WorkerId};
use fabric_engine::CLI_ALLOWLIST;
use fabric_sandbox::{ContainerBackend, SandboxBackend, SubprocessBackend};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fabric_worker=info"));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = Config::resolve(Args::parse());

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

    let work_dir = std::env::temp_dir().join("fabric-worker-jobs");
    let gpu_available = config.gpu != "none" && config.vram_gb > 0;
    let engine = fabric_engine::Engine::new(SystemClock, backend, work_dir, gpu_available);

    let id = WorkerId::new();
    let data_channel_endpoint = format!("ws://{}:{}", config.bind_host, config.bind_port);
    let descriptor = WorkerDescriptor {
        id,
        device_name: config.device_name.clone(),
        gpu: config.gpu.clone(),
        vram_gb: config.vram_gb,
        capabilities: vec!["script".into(), "render".into(), "cli".into(), "notebook-cell".into()],
        installed_tools: CLI_ALLOWLIST.iter().map(|s| s.to_string()).collect(),
        endpoint: Some(data_channel_endpoint.clone()),
        signaling_channel: Some(id.to_string()),
    };

    let app = data_channel::router(engine);
    let addr = format!("{}:{}", config.bind_host, config.bind_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, worker_id = %id, "worker data channel listening");

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    signaling_link::run(config.signaling_url, descriptor, data_channel_endpoint).await;
    server.abort();
    Ok(())
}
