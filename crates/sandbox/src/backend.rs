//! The [`SandboxBackend`] trait and the process handle it returns.

use async_trait::async_trait;
use tokio::process::{Child, ChildStderr, ChildStdout};

use crate::error::SandboxError;
use crate::spec::SandboxSpec;

/// A running sandbox. Guaranteed-release is the caller's job (the engine's
/// execution algorithm), not the handle's: dropping a handle does not kill
/// the process, it only drops the pipes. Callers must call
/// [`SandboxHandle::terminate`] or let [`SandboxHandle::wait`] run to
/// completion on every exit path.
pub struct SandboxHandle {
    child: Child,
    /// Set for container backends; `None` for the direct-subprocess
    /// fallback, which has no separate container identity to clean up.
    pub container_id: Option<String>,
}

impl SandboxHandle {
    pub fn new(child: Child, container_id: Option<String>) -> Self {
        Self { child, container_id }
    }

    pub fn stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    pub fn stderr(&mut self) -> Option<ChildStderr> {
        self.child.stderr.take()
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    pub async fn wait(&mut self) -> std::io::Result<std::process::ExitStatus> {
        self.child.wait().await
    }

    /// Best-effort graceful stop: SIGTERM on unix, then the caller decides
    /// whether to escalate to [`Self::force_kill`] after a grace period.
    #[cfg(unix)]
    pub fn signal_stop(&self) -> std::io::Result<()> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;
        if let Some(pid) = self.pid() {
            let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn signal_stop(&self) -> std::io::Result<()> {
        Ok(())
    }

    pub async fn force_kill(&mut self) -> std::io::Result<()> {
        self.child.kill().await
    }
}

/// Launches a [`SandboxSpec`] and returns a handle to the running process.
/// Implementations: a container runtime backend (docker/podman) and a
/// direct-subprocess fallback with weaker isolation.
#[async_trait]
pub trait SandboxBackend: Send + Sync {
    async fn launch(&self, spec: &SandboxSpec) -> Result<SandboxHandle, SandboxError>;

    /// Human-readable name for logs (`"docker"`, `"podman"`, `"subprocess"`).
    fn name(&self) -> &'static str;
}
