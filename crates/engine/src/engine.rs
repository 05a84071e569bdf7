//! The job execution engine: `submit`/`status`/`artifact`/`log-subscribe`
//! plus the 8-step per-job execution algorithm run on a background task.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use fabric_core::{Clock, Event, JobId, JobMode, JobSnapshot, JobStatus, JobSubmission, LogStream};
use fabric_sandbox::SandboxBackend;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{broadcast, mpsc};

use crate::attestation;
use crate::error::EngineError;
use crate::import_heuristic::scan_unresolved_imports;
use crate::mode;
use crate::state::JobHandle;

/// Exit-code sentinel recorded when a job is killed for exceeding its
/// deadline, matching the conventional unix `timeout(1)` value.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

const TERMINATION_GRACE: Duration = Duration::from_secs(3);

struct EngineInner<C: Clock> {
    clock: C,
    backend: Arc<dyn SandboxBackend>,
    output_root: PathBuf,
    gpu_available: bool,
    event_tx: Option<mpsc::UnboundedSender<Event>>,
    jobs: Mutex<HashMap<JobId, Arc<JobHandle>>>,
}

/// Cheap to clone; every clone shares the same job table and backend.
pub struct Engine<C: Clock> {
    inner: Arc<EngineInner<C>>,
}

impl<C: Clock> Clone for Engine<C> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<C: Clock + 'static> Engine<C> {
    pub fn new(clock: C, backend: Arc<dyn SandboxBackend>, output_root: PathBuf, gpu_available: bool) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                clock,
                backend,
                output_root,
                gpu_available,
                event_tx: None,
                jobs: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn with_event_sink(mut self, tx: mpsc::UnboundedSender<Event>) -> Self {
        Arc::get_mut(&mut self.inner)
            .expect("event sink must be attached before the engine is cloned")
            .event_tx = Some(tx);
        self
    }

    /// Validates the mode-specific payload shape, inserts the job in
    /// `queued` state, and schedules its execution task. Returns
    /// immediately.
    pub fn submit(&self, submission: JobSubmission) -> Result<JobId, EngineError> {
        if submission.payload.trim().is_empty() {
            return Err(EngineError::Validation("payload must not be empty".into()));
        }
        if submission.mode == JobMode::Cli {
            mode::validate_cli_allowlist(&submission.payload)?;
        }

        let id = submission.id.unwrap_or_default();
        let handle = Arc::new(JobHandle::new(id, submission.mode));
        self.inner.jobs.lock().insert(id, handle.clone());

        let inner = self.inner.clone();
        tokio::spawn(async move {
            run_job(inner, handle, submission).await;
        });

        Ok(id)
    }

    pub fn status(&self, id: JobId) -> Result<JobSnapshot, EngineError> {
        let handle = self.job(id)?;
        let state = handle.state.lock();
        Ok(JobSnapshot {
            id,
            status: state.status,
            runtime_ms: state.runtime_ms,
            exit_code: state.exit_code,
            log_tail: handle.log_tail(),
            artifact_names: state.artifact_names.clone(),
            unresolved_imports: state.unresolved_imports.clone(),
        })
    }

    /// Resolves the on-disk path of a captured artifact. Fails
    /// `validation-error` if `filename` contains path separators, `not-
    /// found` if the job or the artifact is unknown.
    pub fn artifact_path(&self, id: JobId, filename: &str) -> Result<PathBuf, EngineError> {
        fabric_core::validate_artifact_name(filename)
            .map_err(|e| EngineError::Validation(e.message))?;
        let handle = self.job(id)?;
        if !handle.state.lock().artifact_names.iter().any(|n| n == filename) {
            return Err(EngineError::NotFound(format!("no artifact named `{filename}` for {id}")));
        }
        Ok(mode::output_dir_for(&self.inner.output_root, id.as_str()).join(filename))
    }

    pub fn log_subscribe(&self, id: JobId) -> Result<broadcast::Receiver<fabric_core::LogLine>, EngineError> {
        Ok(self.job(id)?.subscribe())
    }

    /// Count of jobs not yet in a terminal state, for health reporting.
    pub fn active_job_count(&self) -> usize {
        self.inner
            .jobs
            .lock()
            .values()
            .filter(|handle| matches!(handle.state.lock().status, JobStatus::Queued | JobStatus::Running))
            .count()
    }

    fn job(&self, id: JobId) -> Result<Arc<JobHandle>, EngineError> {
        self.inner.jobs.lock().get(&id).cloned().ok_or_else(|| EngineError::NotFound(format!("unknown job {id}")))
    }
}

/// Removes the scratch file on every exit path out of `run_job`.
struct ScratchGuard(PathBuf);

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

async fn run_job<C: Clock + 'static>(engine: Arc<EngineInner<C>>, handle: Arc<JobHandle>, submission: JobSubmission) {
    let id_str = handle.id.to_string();

    let scratch_dir = engine.output_root.join("scratch");
    if tokio::fs::create_dir_all(&scratch_dir).await.is_err() {
        fail(&engine, &handle, None, "failed to prepare scratch directory".into());
        return;
    }
    let scratch_path = scratch_dir.join(format!("{id_str}.src"));
    if let Err(e) = tokio::fs::write(&scratch_path, &submission.payload).await {
        fail(&engine, &handle, None, format!("failed to materialize payload: {e}"));
        return;
    }
    let _scratch_guard = ScratchGuard(scratch_path.clone());

    if matches!(handle.mode, JobMode::Script | JobMode::NotebookCell) {
        let unresolved = scan_unresolved_imports(&submission.payload);
        handle.state.lock().unresolved_imports = unresolved;
    }

    let start_ms = engine.clock.epoch_ms();
    {
        let mut state = handle.state.lock();
        state.status = JobStatus::Running;
        state.started_at_ms = Some(start_ms);
    }
    emit_status(&engine, &handle);

    let artifacts_dir = mode::output_dir_for(&engine.output_root, &id_str);
    if tokio::fs::create_dir_all(&artifacts_dir).await.is_err() {
        fail(&engine, &handle, Some(start_ms), "failed to prepare artifact directory".into());
        return;
    }

    let container_name = format!("fabric-{id_str}");
    let spec = match handle.mode {
        JobMode::Script => mode::script_spec(&scratch_path, container_name.clone()),
        JobMode::NotebookCell => mode::notebook_spec(&scratch_path, container_name.clone()),
        JobMode::Render => {
            mode::render_spec(&scratch_path, &artifacts_dir, container_name.clone(), engine.gpu_available)
        }
        JobMode::Cli => mode::cli_spec(&submission.payload, container_name.clone()),
    };

    if handle.mode == JobMode::NotebookCell {
        let digest = attestation::compute_digest(&id_str, &submission.payload, &container_name, start_ms);
        handle.push_log(LogStream::System, format!("attestation: {digest}"));
    }

    let mut sandbox_handle = match engine.backend.launch(&spec).await {
        Ok(h) => h,
        Err(e) => {
            fail(&engine, &handle, Some(start_ms), format!("sandbox launch failed: {e}"));
            return;
        }
    };

    let stdout = sandbox_handle.stdout();
    let stderr = sandbox_handle.stderr();
    let stdout_buf = Arc::new(Mutex::new(String::new()));
    let stderr_buf = Arc::new(Mutex::new(String::new()));

    let stdout_task = stdout.map(|pipe| {
        tokio::spawn(drain_lines(pipe, LogStream::Stdout, handle.clone(), stdout_buf.clone()))
    });
    let stderr_task = stderr.map(|pipe| {
        tokio::spawn(drain_lines(pipe, LogStream::Stderr, handle.clone(), stderr_buf.clone()))
    });

    let deadline = mode::deadline_for(handle.mode);
    let mut timed_out = false;
    let exit_code = match tokio::time::timeout(deadline, sandbox_handle.wait()).await {
        Ok(Ok(status)) => status.code().unwrap_or(-1),
        Ok(Err(e)) => {
            handle.push_log(LogStream::System, format!("internal error waiting on sandbox: {e}"));
            -1
        }
        Err(_elapsed) => {
            let _ = sandbox_handle.signal_stop();
            tokio::time::sleep(TERMINATION_GRACE).await;
            let _ = sandbox_handle.force_kill().await;
            handle.push_log(LogStream::System, "execution deadline exceeded, sandbox terminated".into());
            timed_out = true;
            TIMEOUT_EXIT_CODE
        }
    };

    if let Some(t) = stdout_task {
        let _ = t.await;
    }
    if let Some(t) = stderr_task {
        let _ = t.await;
    }

    let mut artifact_names = Vec::new();
    let stdout_text = stdout_buf.lock().clone();
    if !stdout_text.is_empty() && tokio::fs::write(artifacts_dir.join("stdout.txt"), &stdout_text).await.is_ok() {
        artifact_names.push("stdout.txt".to_string());
    }
    let stderr_text = stderr_buf.lock().clone();
    if !stderr_text.is_empty() && tokio::fs::write(artifacts_dir.join("stderr.txt"), &stderr_text).await.is_ok() {
        artifact_names.push("stderr.txt".to_string());
    }
    if handle.mode == JobMode::Render {
        if let Ok(mut entries) = tokio::fs::read_dir(&artifacts_dir).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                if let Some(name) = entry.file_name().to_str() {
                    if name != "stdout.txt" && name != "stderr.txt" {
                        artifact_names.push(name.to_string());
                    }
                }
            }
        }
    }

    let runtime_ms = engine.clock.epoch_ms().saturating_sub(start_ms);
    let final_status = if !timed_out && exit_code == 0 { JobStatus::Completed } else { JobStatus::Failed };

    {
        let mut state = handle.state.lock();
        state.status = final_status;
        state.exit_code = Some(exit_code);
        state.runtime_ms = Some(runtime_ms);
        state.artifact_names = artifact_names;
    }
    emit_status(&engine, &handle);
}

async fn drain_lines<R: AsyncRead + Unpin>(
    pipe: R,
    stream: LogStream,
    handle: Arc<JobHandle>,
    buf: Arc<Mutex<String>>,
) {
    let mut lines = BufReader::new(pipe).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                buf.lock().push_str(&line);
                buf.lock().push('\n');
                handle.push_log(stream, line);
            }
            Ok(None) => break,
            Err(e) => {
                handle.push_log(stream, format!("log stream error: {e}"));
                break;
            }
        }
    }
}

fn fail<C: Clock>(engine: &EngineInner<C>, handle: &JobHandle, start_ms: Option<u64>, message: String) {
    handle.push_log(LogStream::System, message.clone());
    let runtime_ms = start_ms.map(|s| engine.clock.epoch_ms().saturating_sub(s));
    {
        let mut state = handle.state.lock();
        state.status = JobStatus::Failed;
        state.runtime_ms = runtime_ms;
        if state.exit_code.is_none() {
            state.exit_code = Some(-1);
        }
    }
    let state = handle.state.lock();
    if let Some(tx) = &engine.event_tx {
        let _ = tx.send(Event::JobStatus {
            job_id: handle.id,
            state: state.status,
            runtime_ms: state.runtime_ms,
            exit_code: state.exit_code,
            artifact_names: state.artifact_names.clone(),
            error_message: Some(message),
        });
    }
}

fn emit_status<C: Clock>(engine: &EngineInner<C>, handle: &JobHandle) {
    let state = handle.state.lock();
    if let Some(tx) = &engine.event_tx {
        let _ = tx.send(Event::JobStatus {
            job_id: handle.id,
            state: state.status,
            runtime_ms: state.runtime_ms,
            exit_code: state.exit_code,
            artifact_names: state.artifact_names.clone(),
            error_message: None,
        });
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
