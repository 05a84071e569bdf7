//! Sandbox launch and I/O errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("container runtime unavailable: {0}")]
    RuntimeUnavailable(String),
    #[error("failed to spawn sandbox process: {0}")]
    Spawn(#[from] std::io::Error),
}
