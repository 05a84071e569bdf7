//! Centralized environment variable access for the coordinator binary,
//! with a `clap` CLI overlay for the values an operator is most likely to
//! override at the command line.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Distributed compute fabric coordinator")]
pub struct Args {
    /// Host to bind the REST/WebSocket surface to.
    #[arg(long)]
    pub bind_host: Option<String>,
    /// Port to bind the REST/WebSocket surface to.
    #[arg(long)]
    pub bind_port: Option<u16>,
    /// Directory for the registry snapshot and job output/artifacts.
    #[arg(long)]
    pub state_dir: Option<PathBuf>,
    /// Bearer token required on every request. Disabled if unset.
    #[arg(long)]
    pub auth_token: Option<String>,
    /// Permit the no-sandbox direct-subprocess fallback when no container
    /// runtime is available.
    #[arg(long)]
    pub allow_no_sandbox: bool,
}

pub struct Config {
    pub bind_host: String,
    pub bind_port: u16,
    pub state_dir: PathBuf,
    pub auth_token: Option<String>,
    pub allow_no_sandbox: bool,
    pub liveness_timeout_ms: u64,
    pub sweep_interval_ms: u64,
}

impl Config {
    pub fn resolve(args: Args) -> Self {
        let bind_host = args.bind_host.or_else(|| std::env::var("FABRIC_BIND_HOST").ok()).unwrap_or_else(|| "0.0.0.0".into());
        let bind_port = args
            .bind_port
            .or_else(|| std::env::var("FABRIC_BIND_PORT").ok().and_then(|s| s.parse().ok()))
            .unwrap_or(8088);
        let state_dir = args
            .state_dir
            .or_else(|| std::env::var("FABRIC_STATE_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("/tmp/fabric-coordinator"));
        let auth_token = args.auth_token.or_else(|| std::env::var("FABRIC_AUTH_TOKEN").ok()).filter(|s| !s.is_empty());
        let allow_no_sandbox = args.allow_no_sandbox
            || std::env::var("FABRIC_ALLOW_NO_SANDBOX").map(|v| v == "1" || v == "true").unwrap_or(false);
        let liveness_timeout_ms = std::env::var("FABRIC_LIVENESS_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(fabric_registry::DEFAULT_LIVENESS_TIMEOUT_MS);
        let sweep_interval_ms = std::env::var("FABRIC_SWEEP_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(fabric_registry::DEFAULT_SWEEP_INTERVAL_MS);

        Self { bind_host, bind_port, state_dir, auth_token, allow_no_sandbox, liveness_timeout_ms, sweep_interval_ms }
    }
}
