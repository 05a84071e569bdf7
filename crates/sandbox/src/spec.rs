//! Declarative description of a single sandbox launch, built programmatically
//! (never shell-concatenated) and handed to a [`crate::SandboxBackend`].

use std::path::PathBuf;

/// A filesystem mount from the host into the sandbox.
#[derive(Debug, Clone)]
pub struct Mount {
    pub host_path: PathBuf,
    pub container_path: String,
    pub read_only: bool,
}

/// Resource caps for a single run. Defaults are the `script`-mode caps from
/// the component design; `render` mode overrides cpus/memory_mb/gpu.
#[derive(Debug, Clone)]
pub struct ResourceCaps {
    pub cpus: f32,
    pub memory_mb: u64,
    pub network: bool,
    pub nofile_ulimit: u64,
    pub read_only_rootfs: bool,
    pub gpu: bool,
}

impl Default for ResourceCaps {
    fn default() -> Self {
        Self {
            cpus: 1.0,
            memory_mb: 2048,
            network: false,
            nofile_ulimit: 1024,
            read_only_rootfs: true,
            gpu: false,
        }
    }
}

/// Full description of one sandbox run. The container backend turns this
/// into an argv array for `docker run`/`podman run`; the subprocess
/// fallback runs `argv` directly and ignores the container-only fields.
#[derive(Debug, Clone)]
pub struct SandboxSpec {
    /// Container image, e.g. `python:3.11-slim`. Ignored by the subprocess
    /// fallback.
    pub image: String,
    /// Program and arguments to execute inside the sandbox.
    pub argv: Vec<String>,
    pub mounts: Vec<Mount>,
    pub caps: ResourceCaps,
    pub working_dir: Option<String>,
    /// Stable name assigned by the caller (the engine), used as `--name`
    /// for the container backend so the resulting container id is known
    /// up front rather than parsed back out of `docker run`'s output.
    /// Ignored by the subprocess fallback.
    pub container_name: Option<String>,
}
