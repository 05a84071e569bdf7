//! Signaling relay errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalingError {
    /// A third offer arrived for a session-id that already has two
    /// endpoints. Exactly two endpoints are allowed per session.
    #[error("session already has two endpoints")]
    DuplicateSession,
    #[error("no worker connected with that id")]
    WorkerNotConnected,
    #[error("session is not in a state that accepts an answer")]
    NotAwaitingAnswer,
}
