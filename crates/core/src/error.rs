//! Shared error taxonomy.
//!
//! Every request-shaped failure in the fabric collapses to one of these
//! kinds before it crosses a crate boundary. Binaries translate a `kind` to
//! an HTTP status; libraries only ever produce a `kind`.

use serde::{Deserialize, Serialize};

/// Machine-readable error kind, stable across the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    ValidationError,
    NotFound,
    InfrastructureError,
    TimeoutError,
    DecryptionError,
    ProtocolError,
    Cancelled,
}

crate::simple_display! {
    ErrorKind {
        ValidationError => "validation-error",
        NotFound => "not-found",
        InfrastructureError => "infrastructure-error",
        TimeoutError => "timeout-error",
        DecryptionError => "decryption-error",
        ProtocolError => "protocol-error",
        Cancelled => "cancelled",
    }
}

/// A `kind` plus a human-readable message, suitable for display in a
/// status response.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct FabricError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FabricError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InfrastructureError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TimeoutError, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProtocolError, message)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
