//! Engine-facing errors, translated at the request boundary into
//! [`fabric_core::FabricError`].

use fabric_core::{ErrorKind, FabricError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Infrastructure(String),
}

impl From<EngineError> for FabricError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => FabricError::validation(msg),
            EngineError::NotFound(msg) => FabricError::not_found(msg),
            EngineError::Infrastructure(msg) => FabricError::infrastructure(msg),
        }
    }
}

impl From<fabric_sandbox::SandboxError> for EngineError {
    fn from(err: fabric_sandbox::SandboxError) -> Self {
        EngineError::Infrastructure(err.to_string())
    }
}
