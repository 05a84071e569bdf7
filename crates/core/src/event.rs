//! The event sum type published on the bidirectional event channel.
//!
//! This is the explicit dispatch surface called for by the redesign notes:
//! one discriminated union instead of duck-typed handlers registered at
//! construction time.

use serde::{Deserialize, Serialize};

use crate::job::{JobId, JobStatus, LogLine};
use crate::session::SessionId;
use crate::worker::WorkerDescriptor;

/// A signaling relay payload: `offer`, `answer`, or an ICE candidate. The
/// coordinator never inspects this beyond routing it by session id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SignalingPayload {
    Offer { sdp: String },
    Answer { sdp: String },
    IceCandidate { candidate: String, sdp_mid: Option<String>, sdp_mline_index: Option<u16> },
}

/// One event on the bidirectional channel, in either direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    JobStatus {
        job_id: JobId,
        state: JobStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        runtime_ms: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exit_code: Option<i32>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        artifact_names: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error_message: Option<String>,
    },
    JobLog {
        job_id: JobId,
        line: LogLine,
    },
    CellOutput {
        session_id: SessionId,
        cell_id: String,
        chunk: String,
        state: JobStatus,
    },
    WorkerRegistered {
        worker: WorkerDescriptor,
    },
    HeartbeatAck,
    SessionSignaling {
        session_id: SessionId,
        payload: SignalingPayload,
    },
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
