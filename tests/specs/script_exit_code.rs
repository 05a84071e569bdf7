use std::time::Duration;

use crate::support::Coordinator;

#[tokio::test]
async fn script_job_propagates_nonzero_exit_code() {
    let coordinator = Coordinator::spawn().await;

    let job_id = coordinator.submit("script", "import sys; sys.exit(2)\n").await;
    let snapshot = coordinator.poll_until_terminal(&job_id, Duration::from_secs(30)).await;

    assert_eq!(snapshot["status"], "failed");
    assert_eq!(snapshot["exit_code"], 2);

    let names: Vec<&str> =
        snapshot["artifact_names"].as_array().expect("artifact_names array").iter().filter_map(|v| v.as_str()).collect();
    assert!(!names.contains(&"stdout.txt"), "did not expect a stdout artifact, got {names:?}");
    assert!(!names.contains(&"stderr.txt"), "did not expect a stderr artifact, got {names:?}");
}
