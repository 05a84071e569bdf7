use std::time::Duration;

use crate::support::Coordinator;

#[tokio::test]
async fn script_job_completes_and_captures_stdout() {
    let coordinator = Coordinator::spawn().await;

    let job_id = coordinator.submit("script", "print('hello')\n").await;
    let snapshot = coordinator.poll_until_terminal(&job_id, Duration::from_secs(30)).await;

    assert_eq!(snapshot["status"], "completed");
    assert_eq!(snapshot["exit_code"], 0);

    let artifacts = snapshot["artifact_names"].as_array().expect("artifact_names array");
    let names: Vec<&str> = artifacts.iter().filter_map(|v| v.as_str()).collect();
    assert!(names.contains(&"stdout.txt"), "expected a stdout.txt artifact, got {names:?}");
    assert!(!names.contains(&"stderr.txt"), "did not expect a stderr artifact, got {names:?}");

    let body = coordinator
        .client
        .get(coordinator.url(&format!("/artifact/{job_id}/stdout.txt")))
        .send()
        .await
        .expect("artifact request")
        .bytes()
        .await
        .expect("artifact body");
    assert_eq!(body.as_ref(), b"hello\n");
}
