//! Worker identifier and registry row shape.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a worker process.
    pub struct WorkerId("wrk-");
}

/// Liveness status of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    Ready,
    Busy,
    Offline,
}

crate::simple_display! {
    WorkerStatus {
        Ready => "ready",
        Busy => "busy",
        Offline => "offline",
    }
}

/// What a worker advertises at register time. Everything here is supplied
/// by the worker process itself; the registry does not validate content,
/// only shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerDescriptor {
    pub id: WorkerId,
    pub device_name: String,
    pub gpu: String,
    pub vram_gb: u32,
    /// Coarse mode-compatibility filter, e.g. `["script", "render"]`.
    pub capabilities: Vec<String>,
    /// Finer diagnostic surface reported by the worker's capability probe,
    /// e.g. `["python3", "blender"]`. Display-only; never gates dispatch.
    #[serde(default)]
    pub installed_tools: Vec<String>,
    /// Reachable directly by the client for the peer-to-peer path.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Identifier the worker uses on the signaling channel.
    #[serde(default)]
    pub signaling_channel: Option<String>,
}

/// A worker as stored in the registry, with liveness bookkeeping layered
/// on top of the advertised descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerEntry {
    #[serde(flatten)]
    pub descriptor: WorkerDescriptor,
    pub status: WorkerStatus,
    pub registered_at_ms: u64,
    pub last_heartbeat_ms: u64,
}

impl WorkerEntry {
    pub fn is_compatible(&self, capability: &str) -> bool {
        self.descriptor.capabilities.iter().any(|c| c == capability)
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
