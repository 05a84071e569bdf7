use super::*;

fn descriptor() -> WorkerDescriptor {
    WorkerDescriptor {
        id: WorkerId::new(),
        device_name: "mac-studio-1".into(),
        gpu: "M2 Ultra".into(),
        vram_gb: 64,
        capabilities: vec!["script".into(), "render".into()],
        installed_tools: vec!["python3".into()],
        endpoint: Some("100.64.0.5:7000".into()),
        signaling_channel: Some("chan-1".into()),
    }
}

#[test]
fn is_compatible_checks_capability_tags_only() {
    let entry = WorkerEntry {
        descriptor: descriptor(),
        status: WorkerStatus::Ready,
        registered_at_ms: 0,
        last_heartbeat_ms: 0,
    };
    assert!(entry.is_compatible("script"));
    assert!(!entry.is_compatible("cli"));
}

#[test]
fn serde_flattens_descriptor_into_entry() {
    let entry = WorkerEntry {
        descriptor: descriptor(),
        status: WorkerStatus::Busy,
        registered_at_ms: 10,
        last_heartbeat_ms: 20,
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["device_name"], "mac-studio-1");
    assert_eq!(json["status"], "busy");
}
