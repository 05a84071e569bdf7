//! Background sweep task: demotes stale workers on a fixed cadence.
//! Runs as its own long-lived task per the unified-concurrency redesign —
//! not a thread-based cleanup loop racing the coroutine-driven request path.

use std::sync::Arc;
use std::time::Duration;

use fabric_core::Clock;
use tokio_util::sync::CancellationToken;

use crate::registry::Registry;

/// Spawns the sweep loop. An error inside a single tick is logged and the
/// sweep continues on its next tick; it never aborts the task.
pub fn spawn_sweep_task<C: Clock + 'static>(
    registry: Arc<Registry<C>>,
    interval_ms: u64,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("registry sweep task shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let demoted = registry.sweep();
                    if demoted > 0 {
                        tracing::info!(demoted, "registry sweep demoted stale workers");
                    }
                }
            }
        }
    })
}
