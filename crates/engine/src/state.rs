//! Per-job mutable state: the log list, terminal fields, and the
//! broadcast channel `log-subscribe` joins.

use fabric_core::{JobId, JobMode, JobStatus, LogLine, LogStream};
use parking_lot::Mutex;
use tokio::sync::broadcast;

/// Status-endpoint log tail length (default last N lines).
pub const LOG_TAIL_LEN: usize = 100;

pub struct JobState {
    pub status: JobStatus,
    pub started_at_ms: Option<u64>,
    pub runtime_ms: Option<u64>,
    pub exit_code: Option<i32>,
    pub logs: Vec<LogLine>,
    pub next_seq: u64,
    pub artifact_names: Vec<String>,
    pub unresolved_imports: Vec<String>,
}

impl JobState {
    fn new() -> Self {
        Self {
            status: JobStatus::Queued,
            started_at_ms: None,
            runtime_ms: None,
            exit_code: None,
            logs: Vec::new(),
            next_seq: 0,
            artifact_names: Vec::new(),
            unresolved_imports: Vec::new(),
        }
    }
}

/// A submitted job: identity plus the mutable state the execution task
/// updates and `status`/`log-subscribe` read.
pub struct JobHandle {
    pub id: JobId,
    pub mode: JobMode,
    pub state: Mutex<JobState>,
    log_tx: broadcast::Sender<LogLine>,
}

impl JobHandle {
    pub fn new(id: JobId, mode: JobMode) -> Self {
        let (log_tx, _) = broadcast::channel(1024);
        Self { id, mode, state: Mutex::new(JobState::new()), log_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogLine> {
        self.log_tx.subscribe()
    }

    /// Appends a log line (truncating oversized text) and forwards it to
    /// every `log-subscribe` stream. Never blocks on slow subscribers —
    /// a lagging receiver just misses old entries, it does not stall
    /// execution.
    pub fn push_log(&self, stream: LogStream, text: impl Into<String>) {
        let mut state = self.state.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        let line = LogLine::new(seq, stream, text);
        state.logs.push(line.clone());
        drop(state);
        let _ = self.log_tx.send(line);
    }

    pub fn log_tail(&self) -> Vec<LogLine> {
        let state = self.state.lock();
        let start = state.logs.len().saturating_sub(LOG_TAIL_LEN);
        state.logs[start..].to_vec()
    }
}
