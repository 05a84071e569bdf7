//! Per-mode sandbox dispatch: image, argv, resource caps and deadline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use fabric_core::JobMode;
use fabric_sandbox::{Mount, ResourceCaps, SandboxSpec};

use crate::error::EngineError;

/// Commands a `cli`-mode job may invoke. Anything else fails
/// `validation-error`; used for demos and self-tests only.
pub const CLI_ALLOWLIST: &[&str] = &["echo", "printf", "ls", "cat", "python3"];

const SCRIPT_DEADLINE: Duration = Duration::from_secs(300);
const NOTEBOOK_DEADLINE: Duration = Duration::from_secs(120);

pub fn deadline_for(mode: JobMode) -> Duration {
    match mode {
        JobMode::NotebookCell => NOTEBOOK_DEADLINE,
        _ => SCRIPT_DEADLINE,
    }
}

/// Extracts the command name a `cli`-mode payload would invoke, i.e. its
/// first whitespace-separated token.
pub fn cli_command_name(payload: &str) -> Option<&str> {
    payload.split_whitespace().next()
}

pub fn validate_cli_allowlist(payload: &str) -> Result<(), EngineError> {
    let Some(command) = cli_command_name(payload) else {
        return Err(EngineError::Validation("cli payload is empty".into()));
    };
    if !CLI_ALLOWLIST.contains(&command) {
        return Err(EngineError::Validation(format!("command `{command}` is not on the allow-list")));
    }
    Ok(())
}

/// Builds the sandbox spec for `script`/`notebook-cell` modes: the scratch
/// file bind-mounted read-only at a fixed in-container path, a pinned 1
/// CPU / 2 GiB cap, no network, read-only rootfs.
pub fn script_spec(scratch_path: &Path, container_name: String) -> SandboxSpec {
    const IN_CONTAINER_PATH: &str = "/sandbox/task.py";
    SandboxSpec {
        image: "python:3.11-slim".into(),
        argv: vec!["python3".into(), IN_CONTAINER_PATH.into()],
        mounts: vec![Mount {
            host_path: scratch_path.to_path_buf(),
            container_path: IN_CONTAINER_PATH.into(),
            read_only: true,
        }],
        caps: ResourceCaps::default(),
        working_dir: None,
        container_name: Some(container_name),
    }
}

/// Builds the sandbox spec for `render` mode: a higher-capped container
/// with a read-write output directory mount. GPU passthrough is requested
/// only when the caller reports both a host GPU and runtime support for
/// device attachment.
pub fn render_spec(
    scratch_path: &Path,
    output_dir: &Path,
    container_name: String,
    gpu_available: bool,
) -> SandboxSpec {
    const SCENE_PATH: &str = "/sandbox/scene.template";
    const OUTPUT_PATH: &str = "/sandbox/output";
    SandboxSpec {
        image: "fabric/renderer:latest".into(),
        argv: vec!["render".into(), SCENE_PATH.into(), "--out".into(), OUTPUT_PATH.into()],
        mounts: vec![
            Mount { host_path: scratch_path.to_path_buf(), container_path: SCENE_PATH.into(), read_only: true },
            Mount { host_path: output_dir.to_path_buf(), container_path: OUTPUT_PATH.into(), read_only: false },
        ],
        caps: ResourceCaps {
            cpus: 4.0,
            memory_mb: 8192,
            network: false,
            read_only_rootfs: false,
            gpu: gpu_available,
            ..ResourceCaps::default()
        },
        working_dir: None,
        container_name: Some(container_name),
    }
}

/// Builds the sandbox spec for a validated `cli`-mode payload.
pub fn cli_spec(payload: &str, container_name: String) -> SandboxSpec {
    let argv: Vec<String> = payload.split_whitespace().map(str::to_string).collect();
    SandboxSpec {
        image: "python:3.11-slim".into(),
        argv,
        mounts: Vec::new(),
        caps: ResourceCaps::default(),
        working_dir: None,
        container_name: Some(container_name),
    }
}

pub fn notebook_spec(scratch_path: &Path, container_name: String) -> SandboxSpec {
    script_spec(scratch_path, container_name)
}

pub fn output_dir_for(root: &Path, job_id: &str) -> PathBuf {
    root.join(job_id).join("output")
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
