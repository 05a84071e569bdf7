//! Registry persistence errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("io error persisting registry snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialize registry snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
