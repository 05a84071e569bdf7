use super::*;
use fabric_core::FakeClock;

#[test]
fn create_assigns_established_state_and_no_secure_channel() {
    let sessions = NotebookSessions::new(FakeClock::new());
    let session = sessions.create(WorkerId::from_string("wrk-a"), "client-1".into());
    assert_eq!(session.signaling_state, SignalingState::Established);
    assert_eq!(session.secure_channel_state, SecureChannelState::None);
}

#[test]
fn get_returns_none_for_unknown_session() {
    let sessions = NotebookSessions::new(FakeClock::new());
    assert!(sessions.get(SessionId::new()).is_none());
}

#[test]
fn restart_refreshes_timestamp_but_keeps_identity() {
    let clock = FakeClock::new();
    let sessions = NotebookSessions::new(clock.clone());
    let created = sessions.create(WorkerId::from_string("wrk-a"), "client-1".into());

    clock.advance(std::time::Duration::from_secs(5));
    let restarted = sessions.restart(created.id).unwrap();

    assert_eq!(restarted.id, created.id);
    assert!(restarted.created_at_ms > created.created_at_ms);
}

#[test]
fn restart_unknown_session_returns_none() {
    let sessions = NotebookSessions::new(FakeClock::new());
    assert!(sessions.restart(SessionId::new()).is_none());
}
