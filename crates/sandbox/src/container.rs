//! Container runtime backend: shells out to `docker`/`podman run` with a
//! programmatically built argv array (never a shell-concatenated string),
//! per the platform-abstraction redesign note.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::backend::{SandboxBackend, SandboxHandle};
use crate::error::SandboxError;
use crate::spec::SandboxSpec;

/// Shells out to a container CLI (`docker` or `podman`) with `run --rm`,
/// resource caps, and read-only bind mounts built from the spec.
pub struct ContainerBackend {
    runtime: String,
}

impl ContainerBackend {
    pub fn new(runtime: impl Into<String>) -> Self {
        Self { runtime: runtime.into() }
    }

    /// Probe for a usable container runtime, trying `docker` then `podman`.
    /// Returns [`SandboxError::RuntimeUnavailable`] if neither responds to
    /// `<runtime> version`.
    pub async fn detect() -> Result<Self, SandboxError> {
        for candidate in ["docker", "podman"] {
            let ok = Command::new(candidate)
                .arg("version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
                .map(|status| status.success())
                .unwrap_or(false);
            if ok {
                return Ok(Self::new(candidate));
            }
        }
        Err(SandboxError::RuntimeUnavailable(
            "neither docker nor podman responded to `version`".into(),
        ))
    }

    fn build_argv(&self, spec: &SandboxSpec) -> Vec<String> {
        let mut argv = vec!["run".to_string(), "--rm".to_string()];

        argv.push(format!("--cpus={}", spec.caps.cpus));
        argv.push(format!("--memory={}m", spec.caps.memory_mb));
        if !spec.caps.network {
            argv.push("--network=none".to_string());
        }
        argv.push("--ulimit".to_string());
        argv.push(format!("nofile={}:{}", spec.caps.nofile_ulimit, spec.caps.nofile_ulimit));
        if spec.caps.read_only_rootfs {
            argv.push("--read-only".to_string());
        }
        if spec.caps.gpu {
            argv.push("--gpus".to_string());
            argv.push("all".to_string());
        }
        if let Some(dir) = &spec.working_dir {
            argv.push("-w".to_string());
            argv.push(dir.clone());
        }
        if let Some(name) = &spec.container_name {
            argv.push("--name".to_string());
            argv.push(name.clone());
        }
        for mount in &spec.mounts {
            argv.push("-v".to_string());
            let mode = if mount.read_only { "ro" } else { "rw" };
            argv.push(format!("{}:{}:{}", mount.host_path.display(), mount.container_path, mode));
        }

        argv.push(spec.image.clone());
        argv.extend(spec.argv.iter().cloned());
        argv
    }
}

#[async_trait]
impl SandboxBackend for ContainerBackend {
    async fn launch(&self, spec: &SandboxSpec) -> Result<SandboxHandle, SandboxError> {
        let argv = self.build_argv(spec);
        tracing::debug!(runtime = %self.runtime, argv = ?argv, "launching container sandbox");

        let child = Command::new(&self.runtime)
            .args(&argv)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        Ok(SandboxHandle::new(child, spec.container_name.clone()))
    }

    fn name(&self) -> &'static str {
        "container"
    }
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
