//! In-memory worker table: the single source of truth during normal
//! operation, with periodic snapshotting for crash recovery.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use fabric_core::{Clock, WorkerDescriptor, WorkerEntry, WorkerId, WorkerStatus};
use parking_lot::Mutex;

use crate::error::RegistryError;
use crate::snapshot::{self, RegistrySnapshot, CURRENT_SNAPSHOT_VERSION};

/// Default liveness threshold τ: a worker is stale once its last heartbeat
/// is older than this.
pub const DEFAULT_LIVENESS_TIMEOUT_MS: u64 = 300_000;

/// Default cadence for the background sweep task.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 60_000;

pub struct Registry<C: Clock> {
    table: Mutex<HashMap<WorkerId, WorkerEntry>>,
    clock: C,
    liveness_timeout_ms: u64,
    snapshot_path: Option<PathBuf>,
}

impl<C: Clock> Registry<C> {
    pub fn new(clock: C, liveness_timeout_ms: u64) -> Self {
        Self { table: Mutex::new(HashMap::new()), clock, liveness_timeout_ms, snapshot_path: None }
    }

    pub fn with_snapshot_path(mut self, path: PathBuf) -> Self {
        self.snapshot_path = Some(path);
        self
    }

    /// Upsert by worker id. On insert, status becomes ready and both
    /// timestamps are set to now; on update the advertised descriptor is
    /// replaced wholesale but existing timestamps/status are preserved
    /// aside from last-heartbeat, which is refreshed like any heartbeat.
    pub fn register(&self, descriptor: WorkerDescriptor) -> Result<(), RegistryError> {
        let now = self.clock.epoch_ms();
        let mut table = self.table.lock();
        table
            .entry(descriptor.id.clone())
            .and_modify(|entry| {
                entry.descriptor = descriptor.clone();
                entry.status = WorkerStatus::Ready;
                entry.last_heartbeat_ms = now;
            })
            .or_insert_with(|| WorkerEntry {
                descriptor,
                status: WorkerStatus::Ready,
                registered_at_ms: now,
                last_heartbeat_ms: now,
            });
        drop(table);
        self.persist_best_effort();
        Ok(())
    }

    /// Sets last-heartbeat = now and status = ready. Heartbeat without a
    /// prior register is logged and dropped; returns `false` in that case.
    pub fn heartbeat(&self, id: &WorkerId) -> bool {
        let now = self.clock.epoch_ms();
        let mut table = self.table.lock();
        match table.get_mut(id) {
            Some(entry) => {
                entry.last_heartbeat_ms = now;
                entry.status = WorkerStatus::Ready;
                true
            }
            None => {
                tracing::warn!(worker_id = %id, "heartbeat for unregistered worker, dropped");
                false
            }
        }
    }

    pub fn get(&self, id: &WorkerId) -> Option<WorkerEntry> {
        self.table.lock().get(id).cloned()
    }

    /// `active_only` filters out entries whose last-heartbeat age exceeds
    /// τ, independent of their stored status (a sweep may not have run yet).
    pub fn list(&self, active_only: bool) -> Vec<WorkerEntry> {
        let now = self.clock.epoch_ms();
        self.table
            .lock()
            .values()
            .filter(|entry| !active_only || now.saturating_sub(entry.last_heartbeat_ms) <= self.liveness_timeout_ms)
            .cloned()
            .collect()
    }

    /// For every entry with status != offline and age > τ, set status =
    /// offline. Never deletes rows. Returns the number of entries demoted.
    pub fn sweep(&self) -> usize {
        let now = self.clock.epoch_ms();
        let mut demoted = 0;
        let mut table = self.table.lock();
        for entry in table.values_mut() {
            if entry.status != WorkerStatus::Offline
                && now.saturating_sub(entry.last_heartbeat_ms) > self.liveness_timeout_ms
            {
                entry.status = WorkerStatus::Offline;
                demoted += 1;
            }
        }
        drop(table);
        if demoted > 0 {
            self.persist_best_effort();
        }
        demoted
    }

    /// Distinct count of populated endpoint addresses, used for capacity
    /// reporting. Two workers sharing an endpoint count once.
    pub fn device_count(&self) -> usize {
        self.table
            .lock()
            .values()
            .filter_map(|entry| entry.descriptor.endpoint.as_deref())
            .collect::<HashSet<_>>()
            .len()
    }

    fn persist_best_effort(&self) {
        let Some(path) = &self.snapshot_path else { return };
        let snapshot = RegistrySnapshot {
            version: CURRENT_SNAPSHOT_VERSION,
            workers: self.table.lock().values().cloned().collect(),
            saved_at_ms: self.clock.epoch_ms(),
        };
        if let Err(err) = snapshot::write_snapshot(path, &snapshot) {
            tracing::warn!(error = %err, "failed to persist registry snapshot");
        }
    }

    /// Loads a previously persisted snapshot into the table, if one exists
    /// at `snapshot_path`. Intended to run once at coordinator startup.
    pub fn restore(&self) -> Result<(), RegistryError> {
        let Some(path) = &self.snapshot_path else { return Ok(()) };
        let Some(snapshot) = snapshot::read_snapshot(path)? else { return Ok(()) };
        let mut table = self.table.lock();
        table.clear();
        for entry in snapshot.workers {
            table.insert(entry.descriptor.id.clone(), entry);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
