//! Direct-subprocess fallback used only when no container runtime is
//! available and the operator has explicitly opted in. Weaker isolation:
//! no cgroup caps, no filesystem or network confinement beyond what the
//! host process already has.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::backend::{SandboxBackend, SandboxHandle};
use crate::error::SandboxError;
use crate::spec::SandboxSpec;

#[derive(Default)]
pub struct SubprocessBackend;

#[async_trait]
impl SandboxBackend for SubprocessBackend {
    async fn launch(&self, spec: &SandboxSpec) -> Result<SandboxHandle, SandboxError> {
        // No mount namespace here, so any argv token that names a mount's
        // in-container path is rewritten to the real host path it would
        // have been bound from.
        let argv: Vec<String> = spec
            .argv
            .iter()
            .map(|token| {
                spec.mounts
                    .iter()
                    .find(|m| m.container_path == *token)
                    .map(|m| m.host_path.display().to_string())
                    .unwrap_or_else(|| token.clone())
            })
            .collect();

        let Some((program, args)) = argv.split_first() else {
            return Err(SandboxError::Spawn(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "sandbox spec has an empty argv",
            )));
        };

        tracing::warn!(argv = ?argv, "running job without sandbox isolation (fallback policy enabled)");

        let mut command = Command::new(program);
        command.args(args).stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);
        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }

        let child = command.spawn()?;
        Ok(SandboxHandle::new(child, None))
    }

    fn name(&self) -> &'static str {
        "subprocess"
    }
}
