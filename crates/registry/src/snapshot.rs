//! Snapshot persistence for the worker table: a flat JSON file written
//! atomically via a temp-file-then-rename, so a coordinator restart
//! recovers the last known table without needing a running sweep first.

use std::fs;
use std::path::Path;

use fabric_core::WorkerEntry;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(rename = "v")]
    pub version: u32,
    pub workers: Vec<WorkerEntry>,
    pub saved_at_ms: u64,
}

pub fn write_snapshot(path: &Path, snapshot: &RegistrySnapshot) -> Result<(), RegistryError> {
    let body = serde_json::to_vec_pretty(snapshot)?;
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, &body)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Option<RegistrySnapshot>, RegistryError> {
    if !path.exists() {
        return Ok(None);
    }
    let body = fs::read(path)?;
    Ok(Some(serde_json::from_slice(&body)?))
}
