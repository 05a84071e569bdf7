use std::time::Duration;

use crate::support::Coordinator;

/// The engine's script deadline is a fixed five minutes (see
/// `fabric_engine::mode::SCRIPT_DEADLINE`), so this only runs on request:
/// `cargo test --test specs -- --ignored script_job_killed_after_deadline`.
#[tokio::test]
#[ignore]
async fn script_job_killed_after_deadline() {
    let coordinator = Coordinator::spawn().await;

    let job_id = coordinator.submit("script", "while True: pass\n").await;
    let snapshot = coordinator.poll_until_terminal(&job_id, Duration::from_secs(310)).await;

    assert_eq!(snapshot["status"], "failed");
    assert_eq!(snapshot["exit_code"], 124);

    let runtime_ms = snapshot["runtime_ms"].as_u64().expect("runtime_ms present");
    let deadline_ms = Duration::from_secs(300).as_millis() as u64;
    assert!(runtime_ms >= deadline_ms, "runtime {runtime_ms}ms shorter than the deadline");
    assert!(runtime_ms < deadline_ms + Duration::from_secs(10).as_millis() as u64, "runtime {runtime_ms}ms far past the deadline+grace");

    let log_tail = snapshot["log_tail"].as_array().expect("log_tail array");
    let mentions_deadline = log_tail.iter().any(|line| line["text"].as_str().unwrap_or("").contains("deadline exceeded"));
    assert!(mentions_deadline, "expected a log line noting the deadline was exceeded, got {log_tail:?}");
}
