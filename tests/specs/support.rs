//! Spawns a real `fabric-coordinator` process against a scratch state
//! directory and a free local port, for black-box exercise of the REST
//! surface. One instance per test; dropped (and killed) at end of scope.

use std::process::{Child, Stdio};
use std::time::Duration;

use assert_cmd::cargo::CommandCargoExt;

pub struct Coordinator {
    child: Child,
    pub base_url: String,
    pub client: reqwest::Client,
    _state_dir: tempfile::TempDir,
}

impl Coordinator {
    /// Spawns with the no-sandbox fallback enabled, since the test
    /// environment is not guaranteed to have a container runtime.
    pub async fn spawn() -> Self {
        Self::spawn_with(&["--allow-no-sandbox"]).await
    }

    pub async fn spawn_with(extra_args: &[&str]) -> Self {
        Self::spawn_with_env(extra_args, &[]).await
    }

    /// Like [`Self::spawn_with`] but also sets the given environment
    /// variables on the child process, e.g. to shrink the liveness
    /// timeout/sweep interval for a test.
    pub async fn spawn_with_env(extra_args: &[&str], envs: &[(&str, &str)]) -> Self {
        let state_dir = tempfile::tempdir().expect("create scratch state dir");
        let port = pick_free_port();
        let base_url = format!("http://127.0.0.1:{port}");

        let mut command = std::process::Command::cargo_bin("fabric-coordinator").expect("locate fabric-coordinator binary");
        command
            .arg("--bind-host")
            .arg("127.0.0.1")
            .arg("--bind-port")
            .arg(port.to_string())
            .arg("--state-dir")
            .arg(state_dir.path())
            .args(extra_args)
            .envs(envs.iter().copied())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = command.spawn().expect("spawn fabric-coordinator");
        let client = reqwest::Client::new();

        let coordinator = Self { child, base_url, client, _state_dir: state_dir };
        coordinator.wait_until_ready().await;
        coordinator
    }

    async fn wait_until_ready(&self) {
        for _ in 0..50 {
            if self.client.get(&self.base_url).send().await.is_ok() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("coordinator did not become ready in time");
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Submits a job and returns its id.
    pub async fn submit(&self, mode: &str, payload: &str) -> String {
        let body = serde_json::json!({"mode": mode, "payload": payload});
        let resp: serde_json::Value =
            self.client.post(self.url("/submit")).json(&body).send().await.expect("submit request").json().await.expect("submit body");
        resp["job_id"].as_str().expect("job_id in submit response").to_string()
    }

    /// Polls `/status/{id}` until it reaches a terminal status, or panics
    /// once `timeout` has elapsed.
    pub async fn poll_until_terminal(&self, job_id: &str, timeout: Duration) -> serde_json::Value {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let snapshot: serde_json::Value = self
                .client
                .get(self.url(&format!("/status/{job_id}")))
                .send()
                .await
                .expect("status request")
                .json()
                .await
                .expect("status body");
            let status = snapshot["status"].as_str().unwrap_or("");
            if matches!(status, "completed" | "failed") {
                return snapshot;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!("job {job_id} did not reach a terminal state within {timeout:?}: {snapshot}");
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn pick_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port").local_addr().expect("read local addr").port()
}

/// A real `fabric-worker` process, pointed at a coordinator's signaling
/// endpoint and its own ephemeral data-channel port.
pub struct Worker {
    child: Child,
    pub data_channel_port: u16,
}

impl Worker {
    pub async fn spawn(coordinator: &Coordinator) -> Self {
        let data_channel_port = pick_free_port();
        let signaling_url = format!("ws://{}/ws", coordinator.base_url.trim_start_matches("http://"));

        let mut command = std::process::Command::cargo_bin("fabric-worker").expect("locate fabric-worker binary");
        command
            .arg("--signaling-url")
            .arg(&signaling_url)
            .arg("--bind-host")
            .arg("127.0.0.1")
            .arg("--bind-port")
            .arg(data_channel_port.to_string())
            .arg("--allow-no-sandbox")
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = command.spawn().expect("spawn fabric-worker");
        let worker = Self { child, data_channel_port };
        worker.wait_until_ready().await;
        worker
    }

    async fn wait_until_ready(&self) {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.data_channel_port)).await.is_ok() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("worker data channel did not become ready in time");
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
