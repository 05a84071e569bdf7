//! Session registry and offer/answer/candidate relay.
//!
//! The coordinator never inspects SDP or ICE payloads here — every method
//! either routes a [`SignalingPayload`] verbatim to the other endpoint's
//! channel or mutates the session's [`SignalingState`], nothing else.

use std::collections::HashMap;

use fabric_core::{Clock, SignalingPayload, SignalingState, WorkerId};
use fabric_core::{Session, SessionId};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::SignalingError;

/// Which side of a session sent a relayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Client,
    Worker,
}

struct SessionRecord {
    session: Session,
    client_tx: mpsc::UnboundedSender<SignalingPayload>,
    client_candidate_seen: bool,
    worker_candidate_seen: bool,
}

/// Session state and best-effort relay, keyed by session-id and worker-id.
///
/// A worker's outbound channel is registered once per signaling connection
/// (`connect_worker`) and shared by every session that worker participates
/// in; a client's outbound channel is registered per-session at offer time.
pub struct SignalingPlane<C: Clock> {
    clock: C,
    sessions: Mutex<HashMap<SessionId, SessionRecord>>,
    worker_channels: Mutex<HashMap<WorkerId, mpsc::UnboundedSender<(SessionId, SignalingPayload)>>>,
}

impl<C: Clock> SignalingPlane<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, sessions: Mutex::new(HashMap::new()), worker_channels: Mutex::new(HashMap::new()) }
    }

    /// Registers a worker's signaling connection. The returned receiver
    /// yields every payload relayed to this worker across all its
    /// sessions, tagged with the session-id it belongs to.
    pub fn connect_worker(&self, worker: WorkerId) -> mpsc::UnboundedReceiver<(SessionId, SignalingPayload)> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.worker_channels.lock().insert(worker, tx);
        rx
    }

    /// A worker's signaling connection dropped: close every session it
    /// holds and drop their entries entirely.
    pub fn disconnect_worker(&self, worker: &WorkerId) -> Vec<SessionId> {
        self.worker_channels.lock().remove(worker);
        let mut sessions = self.sessions.lock();
        let closed: Vec<SessionId> =
            sessions.values().filter(|r| &r.session.worker == worker).map(|r| r.session.id).collect();
        for id in &closed {
            sessions.remove(id);
        }
        closed
    }

    /// Client submits `offer(session-id, offer-sdp)`. Rejects a third
    /// offer for an existing session-id — exactly two endpoints per
    /// session. Returns a receiver for payloads relayed back to the client.
    pub fn offer(
        &self,
        id: SessionId,
        worker: WorkerId,
        client: String,
        sdp: String,
    ) -> Result<mpsc::UnboundedReceiver<SignalingPayload>, SignalingError> {
        let mut sessions = self.sessions.lock();
        if sessions.contains_key(&id) {
            return Err(SignalingError::DuplicateSession);
        }

        let worker_channels = self.worker_channels.lock();
        let Some(worker_tx) = worker_channels.get(&worker) else {
            return Err(SignalingError::WorkerNotConnected);
        };
        let _ = worker_tx.send((id, SignalingPayload::Offer { sdp }));
        drop(worker_channels);

        let (client_tx, client_rx) = mpsc::unbounded_channel();
        sessions.insert(
            id,
            SessionRecord {
                session: Session {
                    id,
                    worker,
                    client,
                    signaling_state: SignalingState::Offered,
                    secure_channel_state: fabric_core::SecureChannelState::None,
                    created_at_ms: self.clock.epoch_ms(),
                },
                client_tx,
                client_candidate_seen: false,
                worker_candidate_seen: false,
            },
        );
        Ok(client_rx)
    }

    /// Worker replies with `answer-sdp`. Relayed verbatim to the client.
    pub fn answer(&self, id: SessionId, sdp: String) -> Result<(), SignalingError> {
        let mut sessions = self.sessions.lock();
        let Some(record) = sessions.get_mut(&id) else {
            // unknown session — best-effort relay, drop silently
            return Ok(());
        };
        if record.session.signaling_state != SignalingState::Offered {
            return Err(SignalingError::NotAwaitingAnswer);
        }
        let _ = record.client_tx.send(SignalingPayload::Answer { sdp });
        record.session.signaling_state = SignalingState::Answered;
        Ok(())
    }

    /// Relay an ICE candidate from one endpoint to the other. Best-effort:
    /// a candidate for an unknown session-id is dropped without error. Once
    /// both endpoints have relayed at least one candidate, the session
    /// advances to `established`.
    pub fn relay_candidate(&self, id: SessionId, from: Endpoint, payload: SignalingPayload) {
        let mut sessions = self.sessions.lock();
        let Some(record) = sessions.get_mut(&id) else { return };

        match from {
            Endpoint::Client => {
                record.client_candidate_seen = true;
                let worker_channels = self.worker_channels.lock();
                if let Some(tx) = worker_channels.get(&record.session.worker) {
                    let _ = tx.send((id, payload));
                }
            }
            Endpoint::Worker => {
                record.worker_candidate_seen = true;
                let _ = record.client_tx.send(payload);
            }
        }

        if record.client_candidate_seen
            && record.worker_candidate_seen
            && record.session.signaling_state == SignalingState::Answered
        {
            record.session.signaling_state = SignalingState::Established;
        }
    }

    /// Either peer disconnecting from a session closes it.
    pub fn close_session(&self, id: SessionId) {
        self.sessions.lock().remove(&id);
    }

    pub fn get(&self, id: SessionId) -> Option<Session> {
        self.sessions.lock().get(&id).map(|r| r.session.clone())
    }

    pub fn is_worker_connected(&self, worker: &WorkerId) -> bool {
        self.worker_channels.lock().contains_key(worker)
    }
}

#[cfg(test)]
#[path = "plane_tests.rs"]
mod tests;
