use super::*;

#[test]
fn job_status_event_tags_as_kebab_case() {
    let event = Event::JobStatus {
        job_id: JobId::new(),
        state: JobStatus::Running,
        runtime_ms: None,
        exit_code: None,
        artifact_names: vec![],
        error_message: None,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "job-status");
    assert!(json.get("runtime_ms").is_none(), "omitted optionals should not serialize");
}

#[test]
fn heartbeat_ack_round_trips() {
    let event = Event::HeartbeatAck;
    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert!(matches!(back, Event::HeartbeatAck));
}

#[test]
fn signaling_event_carries_session_and_payload() {
    let session_id = SessionId::new();
    let event = Event::SessionSignaling {
        session_id,
        payload: SignalingPayload::Offer { sdp: "v=0...".into() },
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "session-signaling");
    assert_eq!(json["payload"]["kind"], "offer");
}
