use super::*;
use fabric_core::FakeClock;
use std::time::Duration;

fn descriptor(id: &str) -> WorkerDescriptor {
    WorkerDescriptor {
        id: WorkerId::from_string(id),
        device_name: "rig-1".into(),
        gpu: "rtx-4090".into(),
        vram_gb: 24,
        capabilities: vec!["script".into(), "render".into()],
        installed_tools: vec!["python3".into()],
        endpoint: Some("10.0.0.5:9000".into()),
        signaling_channel: None,
    }
}

#[test]
fn register_sets_ready_and_timestamps() {
    let clock = FakeClock::new();
    let registry = Registry::new(clock.clone(), DEFAULT_LIVENESS_TIMEOUT_MS);
    let id = WorkerId::from_string("wrk-a");
    registry.register(descriptor("wrk-a")).unwrap();

    let entry = registry.get(&id).unwrap();
    assert_eq!(entry.status, WorkerStatus::Ready);
    assert_eq!(entry.registered_at_ms, entry.last_heartbeat_ms);
}

#[test]
fn heartbeat_on_unregistered_worker_is_dropped() {
    let clock = FakeClock::new();
    let registry = Registry::new(clock, DEFAULT_LIVENESS_TIMEOUT_MS);
    let id = WorkerId::from_string("wrk-ghost");
    assert!(!registry.heartbeat(&id));
    assert!(registry.get(&id).is_none());
}

#[test]
fn heartbeat_refreshes_last_heartbeat_and_status() {
    let clock = FakeClock::new();
    let registry = Registry::new(clock.clone(), DEFAULT_LIVENESS_TIMEOUT_MS);
    let id = WorkerId::from_string("wrk-a");
    registry.register(descriptor("wrk-a")).unwrap();

    clock.advance(Duration::from_millis(500));
    assert!(registry.heartbeat(&id));
    let entry = registry.get(&id).unwrap();
    assert_eq!(entry.last_heartbeat_ms, clock.epoch_ms());
    assert_eq!(entry.status, WorkerStatus::Ready);
}

#[test]
fn list_active_only_filters_stale_entries_by_heartbeat_age() {
    let clock = FakeClock::new();
    let registry = Registry::new(clock.clone(), 1_000);
    registry.register(descriptor("wrk-a")).unwrap();

    clock.advance(Duration::from_millis(2_000));
    assert!(registry.list(true).is_empty());
    assert_eq!(registry.list(false).len(), 1);
}

#[test]
fn sweep_demotes_stale_entries_without_deleting_them() {
    let clock = FakeClock::new();
    let registry = Registry::new(clock.clone(), 1_000);
    registry.register(descriptor("wrk-a")).unwrap();

    clock.advance(Duration::from_millis(2_000));
    let demoted = registry.sweep();
    assert_eq!(demoted, 1);

    let id = WorkerId::from_string("wrk-a");
    let entry = registry.get(&id).unwrap();
    assert_eq!(entry.status, WorkerStatus::Offline);

    // already offline, second sweep demotes nothing further
    assert_eq!(registry.sweep(), 0);
}

#[test]
fn device_count_counts_populated_endpoints_only() {
    let clock = FakeClock::new();
    let registry = Registry::new(clock, DEFAULT_LIVENESS_TIMEOUT_MS);
    registry.register(descriptor("wrk-a")).unwrap();
    let mut no_endpoint = descriptor("wrk-b");
    no_endpoint.endpoint = None;
    registry.register(no_endpoint).unwrap();

    assert_eq!(registry.device_count(), 1);
}

#[test]
fn snapshot_round_trips_through_disk() {
    let clock = FakeClock::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.json");

    {
        let registry = Registry::new(clock.clone(), DEFAULT_LIVENESS_TIMEOUT_MS)
            .with_snapshot_path(path.clone());
        registry.register(descriptor("wrk-a")).unwrap();
    }

    let restored = Registry::new(clock, DEFAULT_LIVENESS_TIMEOUT_MS).with_snapshot_path(path);
    restored.restore().unwrap();
    let id = WorkerId::from_string("wrk-a");
    assert!(restored.get(&id).is_some());
}
