//! Thin REST client for the coordinator: submit a job, poll its status,
//! fetch an artifact. Useful for demos and the black-box integration
//! tests; carries no state of its own.

use std::time::Duration;

use clap::{Parser, Subcommand};
use fabric_core::{JobId, JobMode, JobSubmission};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Client for the distributed compute fabric coordinator")]
struct Cli {
    /// Base URL of the coordinator, e.g. http://127.0.0.1:8088.
    #[arg(long, env = "FABRIC_COORDINATOR_URL", default_value = "http://127.0.0.1:8088")]
    coordinator_url: String,
    /// Bearer token, if the coordinator requires one.
    #[arg(long, env = "FABRIC_AUTH_TOKEN")]
    auth_token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a job and print its id.
    Submit {
        #[arg(long, value_enum)]
        mode: ModeArg,
        /// Source code, command line, or scene template — read from this
        /// literal string.
        payload: String,
    },
    /// Print the current status of a job.
    Status { job_id: String },
    /// Poll a job's status until it reaches a terminal state, printing each
    /// transition.
    Wait { job_id: String },
    /// Download an artifact to stdout.
    Artifact { job_id: String, name: String },
    /// List live workers.
    Workers,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum ModeArg {
    Script,
    Render,
    Cli,
    NotebookCell,
}

impl From<ModeArg> for JobMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Script => JobMode::Script,
            ModeArg::Render => JobMode::Render,
            ModeArg::Cli => JobMode::Cli,
            ModeArg::NotebookCell => JobMode::NotebookCell,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fabric_cli=warn"));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Command::Submit { mode, payload } => {
            let submission = JobSubmission { id: None, mode: mode.into(), payload, session_id: None, cell_id: None };
            let resp: serde_json::Value = request(&client, &cli, reqwest::Method::POST, "/submit")
                .json(&submission)
                .send()
                .await?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Command::Status { job_id } => {
            let _ = JobId::from_string(&job_id);
            let resp: serde_json::Value =
                request(&client, &cli, reqwest::Method::GET, &format!("/status/{job_id}")).send().await?.json().await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Command::Wait { job_id } => {
            loop {
                let resp: serde_json::Value = request(&client, &cli, reqwest::Method::GET, &format!("/status/{job_id}"))
                    .send()
                    .await?
                    .json()
                    .await?;
                let status = resp.get("status").and_then(|v| v.as_str()).unwrap_or("");
                println!("{status}");
                if matches!(status, "completed" | "failed") {
                    println!("{}", serde_json::to_string_pretty(&resp)?);
                    break;
                }
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
        Command::Artifact { job_id, name } => {
            let bytes = request(&client, &cli, reqwest::Method::GET, &format!("/artifact/{job_id}/{name}"))
                .send()
                .await?
                .bytes()
                .await?;
            use std::io::Write;
            std::io::stdout().write_all(&bytes)?;
        }
        Command::Workers => {
            let resp: serde_json::Value = request(&client, &cli, reqwest::Method::GET, "/workers").send().await?.json().await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
    }

    Ok(())
}

fn request(client: &reqwest::Client, cli: &Cli, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
    let url = format!("{}{path}", cli.coordinator_url);
    let builder = client.request(method, url);
    match &cli.auth_token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}
