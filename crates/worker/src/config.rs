//! Worker CLI/env configuration: a single flag to locate the coordinator's
//! signaling endpoint, plus the advertised device descriptor fields and
//! the no-sandbox fallback policy.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Distributed compute fabric worker")]
pub struct Args {
    /// The coordinator's signaling endpoint, e.g. ws://coordinator:8088/ws.
    #[arg(long)]
    pub signaling_url: Option<String>,
    /// Host this worker binds its direct peer-to-peer data-channel server to.
    #[arg(long)]
    pub bind_host: Option<String>,
    /// Port this worker binds its direct peer-to-peer data-channel server to.
    #[arg(long)]
    pub bind_port: Option<u16>,
    /// Permit the no-sandbox direct-subprocess fallback when no container
    /// runtime is available.
    #[arg(long)]
    pub allow_no_sandbox: bool,
    #[arg(long)]
    pub device_name: Option<String>,
    #[arg(long)]
    pub gpu: Option<String>,
    #[arg(long)]
    pub vram_gb: Option<u32>,
}

pub struct Config {
    pub signaling_url: String,
    pub bind_host: String,
    pub bind_port: u16,
    pub allow_no_sandbox: bool,
    pub device_name: String,
    pub gpu: String,
    pub vram_gb: u32,
}

impl Config {
    pub fn resolve(args: Args) -> Self {
        let signaling_url = args
            .signaling_url
            .or_else(|| std::env::var("FABRIC_SIGNALING_URL").ok())
            .unwrap_or_else(|| "ws://127.0.0.1:8088/ws".into());
        let bind_host = args.bind_host.or_else(|| std::env::var("FABRIC_BIND_HOST").ok()).unwrap_or_else(|| "0.0.0.0".into());
        let bind_port = args
            .bind_port
            .or_else(|| std::env::var("FABRIC_BIND_PORT").ok().and_then(|s| s.parse().ok()))
            .unwrap_or(9090);
        let allow_no_sandbox = args.allow_no_sandbox
            || std::env::var("FABRIC_ALLOW_NO_SANDBOX").map(|v| v == "1" || v == "true").unwrap_or(false);
        let device_name = args.device_name.or_else(|| std::env::var("FABRIC_DEVICE_NAME").ok()).unwrap_or_else(|| "unnamed-worker".into());
        let gpu = args.gpu.or_else(|| std::env::var("FABRIC_GPU").ok()).unwrap_or_else(|| "none".into());
        let vram_gb = args.vram_gb.or_else(|| std::env::var("FABRIC_VRAM_GB").ok().and_then(|s| s.parse().ok())).unwrap_or(0);

        Self { signaling_url, bind_host, bind_port, allow_no_sandbox, device_name, gpu, vram_gb }
    }
}
