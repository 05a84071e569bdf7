//! REST handlers: thin translations between axum extractors and the
//! registry/signaling/engine APIs, with all error paths funneled through
//! [`fabric_wire::ApiError`].

use axum::extract::{Multipart, Path, State};
use axum::Json;
use fabric_core::{FabricError, JobId, JobSubmission, SessionId, WorkerId};
use fabric_wire::{
    ApiError, CapacityResponse, CreateSessionRequest, HealthResponse, SessionCreatedResponse, SessionExecRequest,
    SubmitResponse, UploadResponse, WorkersResponse,
};
use tokio::io::AsyncWriteExt;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        active_jobs: state.engine.active_job_count(),
        live_workers: state.registry.list(true).len(),
    })
}

pub async fn workers(State(state): State<AppState>) -> Json<WorkersResponse> {
    Json(WorkersResponse { workers: state.registry.list(true) })
}

pub async fn capacity(State(state): State<AppState>) -> Json<CapacityResponse> {
    Json(CapacityResponse { device_count: state.registry.device_count(), liveness_timeout_ms: state.liveness_timeout_ms })
}

pub async fn submit(
    State(state): State<AppState>,
    Json(submission): Json<JobSubmission>,
) -> Result<(axum::http::StatusCode, Json<SubmitResponse>), ApiError> {
    let job_id = state.engine.submit(submission).map_err(FabricError::from).map_err(ApiError::from)?;
    let snapshot = state.engine.status(job_id).map_err(FabricError::from).map_err(ApiError::from)?;
    Ok((axum::http::StatusCode::ACCEPTED, Json(SubmitResponse { job_id, status: snapshot.status })))
}

pub async fn status(State(state): State<AppState>, Path(job_id): Path<JobId>) -> Result<Json<fabric_core::JobSnapshot>, ApiError> {
    let snapshot = state.engine.status(job_id).map_err(FabricError::from)?;
    Ok(Json(snapshot))
}

pub async fn artifact(
    State(state): State<AppState>,
    Path((job_id, name)): Path<(JobId, String)>,
) -> Result<Vec<u8>, ApiError> {
    let path = state.engine.artifact_path(job_id, &name).map_err(FabricError::from)?;
    tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError(FabricError::infrastructure(format!("failed to read artifact: {e}"))))
}

pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<UploadResponse>, ApiError> {
    tokio::fs::create_dir_all(&state.uploads_dir)
        .await
        .map_err(|e| ApiError(FabricError::infrastructure(format!("failed to prepare uploads directory: {e}"))))?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError(FabricError::validation(format!("malformed multipart body: {e}"))))?
        .ok_or_else(|| ApiError(FabricError::validation("upload request has no file part")))?;

    let filename = field.file_name().unwrap_or("upload.bin").to_string();
    let file_ref = format!("upl-{}", nanoid::nanoid!(19));
    let dest = state.uploads_dir.join(&file_ref);

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError(FabricError::validation(format!("failed to read upload body: {e}"))))?;
    let mut file = tokio::fs::File::create(&dest)
        .await
        .map_err(|e| ApiError(FabricError::infrastructure(format!("failed to create upload file: {e}"))))?;
    file.write_all(&bytes)
        .await
        .map_err(|e| ApiError(FabricError::infrastructure(format!("failed to write upload file: {e}"))))?;

    Ok(Json(UploadResponse { file_ref, filename, size: bytes.len() as u64 }))
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<SessionCreatedResponse>, ApiError> {
    let worker: WorkerId = req.worker_id;
    if state.registry.get(&worker).is_none() {
        return Err(ApiError(FabricError::not_found(format!("unknown worker {worker}"))));
    }
    let session = state.notebook.create(worker, req.client);
    Ok(Json(SessionCreatedResponse { session_id: session.id }))
}

pub async fn session_exec(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
    Json(req): Json<SessionExecRequest>,
) -> Result<axum::http::StatusCode, ApiError> {
    let session = state
        .notebook
        .get(session_id)
        .ok_or_else(|| ApiError(FabricError::not_found(format!("unknown session {session_id}"))))?;

    let submission = JobSubmission {
        id: None,
        mode: fabric_core::JobMode::NotebookCell,
        payload: req.code,
        session_id: Some(session.id),
        cell_id: Some(req.cell_id),
    };
    state.engine.submit(submission).map_err(FabricError::from)?;
    Ok(axum::http::StatusCode::ACCEPTED)
}

pub async fn session_restart(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<axum::http::StatusCode, ApiError> {
    state
        .notebook
        .restart(session_id)
        .ok_or_else(|| ApiError(FabricError::not_found(format!("unknown session {session_id}"))))?;
    Ok(axum::http::StatusCode::OK)
}
