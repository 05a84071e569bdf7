//! Session identifier and the two state machines a session carries:
//! signaling state and secure-channel state. Both are monotone
//! non-decreasing for the life of the session.

use serde::{Deserialize, Serialize};

use crate::worker::WorkerId;

crate::define_id! {
    /// Unique identifier for a client-worker session, allocated by the client.
    pub struct SessionId("ses-");
}

/// Signaling state machine (see the state diagram in the component design).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalingState {
    Offered,
    Answered,
    Established,
    Closed,
}

crate::simple_display! {
    SignalingState {
        Offered => "offered",
        Answered => "answered",
        Established => "established",
        Closed => "closed",
    }
}

/// Secure-channel bootstrap state. Ranked so monotonicity can be checked
/// with a plain integer comparison; `Closed` is reachable from any rank via
/// a protocol or decryption error and is not itself part of the rank order
/// (a session that closes never reopens, handled by [`SignalingState`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecureChannelState {
    None,
    RemotePubkeyKnown,
    SymmetricKeyEstablished,
}

impl SecureChannelState {
    fn rank(self) -> u8 {
        match self {
            SecureChannelState::None => 0,
            SecureChannelState::RemotePubkeyKnown => 1,
            SecureChannelState::SymmetricKeyEstablished => 2,
        }
    }

    /// True if moving from `self` to `next` does not regress the state.
    pub fn can_advance_to(self, next: SecureChannelState) -> bool {
        next.rank() >= self.rank()
    }
}

crate::simple_display! {
    SecureChannelState {
        None => "none",
        RemotePubkeyKnown => "remote-pubkey-known",
        SymmetricKeyEstablished => "symmetric-key-established",
    }
}

/// A session record as held by the signaling plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub worker: WorkerId,
    /// Opaque client identifier, supplied by the client at offer time.
    pub client: String,
    pub signaling_state: SignalingState,
    pub secure_channel_state: SecureChannelState,
    pub created_at_ms: u64,
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
