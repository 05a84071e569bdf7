//! Job identifier, mode and state machine.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a submitted job.
    pub struct JobId("job-");
}

/// Execution mode requested for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobMode {
    Script,
    Render,
    Cli,
    NotebookCell,
}

impl JobMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "script" => Some(Self::Script),
            "render" => Some(Self::Render),
            "cli" => Some(Self::Cli),
            "notebook-cell" => Some(Self::NotebookCell),
            _ => None,
        }
    }
}

crate::simple_display! {
    JobMode {
        Script => "script",
        Render => "render",
        Cli => "cli",
        NotebookCell => "notebook-cell",
    }
}

/// Status of a job. Transitions are monotonic: queued -> running ->
/// (completed | failed). There is no resurrection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// True if `next` is a legal successor of `self` under the monotone
    /// state machine (queued -> running -> terminal, no resurrection).
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

crate::simple_display! {
    JobStatus {
        Queued => "queued",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

/// Which pipe a log line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStream {
    Stdout,
    Stderr,
    System,
}

/// One line of job output, truncated to [`LogLine::MAX_LEN`] bytes with a
/// marker if the producer exceeded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub seq: u64,
    pub stream: LogStream,
    pub text: String,
}

impl LogLine {
    /// Per-line cap; lines longer than this are truncated with a marker.
    pub const MAX_LEN: usize = 16 * 1024;

    pub fn new(seq: u64, stream: LogStream, text: impl Into<String>) -> Self {
        let mut text = text.into();
        if text.len() > Self::MAX_LEN {
            text.truncate(Self::MAX_LEN);
            text.push_str("...[truncated]");
        }
        Self { seq, stream, text }
    }
}

/// What a caller submits to start a job. `payload` is source code for
/// `script`/`notebook-cell`, a scene-script template for `render`, or a
/// command line for `cli`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JobId>,
    pub mode: JobMode,
    pub payload: String,
    /// `notebook-cell` only: the owning session and a caller-chosen cell id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<crate::session::SessionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_id: Option<String>,
}

/// A point-in-time view of a job, returned by `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Tail of the log list (default last 100 lines); the streaming
    /// channel sees every line, this is the status-endpoint view only.
    pub log_tail: Vec<LogLine>,
    pub artifact_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_imports: Vec<String>,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
