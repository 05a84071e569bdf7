//! Request/response payloads for the coordinator's REST surface.

use fabric_core::{JobId, JobStatus, SessionId, WorkerEntry, WorkerId};
use serde::{Deserialize, Serialize};

/// `GET /` — health, counts of active jobs and live workers.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub active_jobs: usize,
    pub live_workers: usize,
}

/// `GET /workers` — the full live worker list.
#[derive(Debug, Serialize)]
pub struct WorkersResponse {
    pub workers: Vec<WorkerEntry>,
}

/// `GET /capacity` — device-count and the liveness threshold used to
/// compute it.
#[derive(Debug, Serialize)]
pub struct CapacityResponse {
    pub device_count: usize,
    pub liveness_timeout_ms: u64,
}

/// `POST /submit` response: `202 {job-id, status: queued}`.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub job_id: JobId,
    pub status: JobStatus,
}

/// `POST /upload` response: a server-side reference to the uploaded bytes.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_ref: String,
    pub filename: String,
    pub size: u64,
}

/// `POST /session` request: which worker the notebook session should run on.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub worker_id: WorkerId,
    pub client: String,
}

/// `POST /session` response: `200 {session-id}`.
#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: SessionId,
}

/// `POST /session/{id}/exec` request: one notebook cell.
#[derive(Debug, Deserialize)]
pub struct SessionExecRequest {
    pub cell_id: String,
    pub code: String,
}

#[cfg(test)]
#[path = "dto_tests.rs"]
mod tests;
