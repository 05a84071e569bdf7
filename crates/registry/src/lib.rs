//! Worker registry: an in-memory table behind a single coarse lock, with
//! heartbeat-driven liveness and periodic snapshot persistence.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod registry;
mod snapshot;
mod sweep;

pub use error::RegistryError;
pub use registry::{Registry, DEFAULT_LIVENESS_TIMEOUT_MS, DEFAULT_SWEEP_INTERVAL_MS};
pub use snapshot::{RegistrySnapshot, CURRENT_SNAPSHOT_VERSION};
pub use sweep::spawn_sweep_task;
