use std::time::Duration;

use crate::support::{Coordinator, Worker};

async fn worker_ids(coordinator: &Coordinator) -> Vec<String> {
    let resp: serde_json::Value =
        coordinator.client.get(coordinator.url("/workers")).send().await.expect("workers request").json().await.expect("workers body");
    resp["workers"]
        .as_array()
        .expect("workers array")
        .iter()
        .filter_map(|w| w["id"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn worker_drops_out_of_active_listing_after_the_liveness_timeout() {
    let coordinator =
        Coordinator::spawn_with_env(&["--allow-no-sandbox"], &[("FABRIC_LIVENESS_TIMEOUT_MS", "300"), ("FABRIC_SWEEP_INTERVAL_MS", "100")])
            .await;
    let worker = Worker::spawn(&coordinator).await;

    // Wait for the worker's registration frame to land before asserting it
    // is listed; the WS handshake and initial registration happen shortly
    // after the data channel server comes up.
    let mut seen = false;
    for _ in 0..50 {
        if !worker_ids(&coordinator).await.is_empty() {
            seen = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(seen, "worker never appeared in /workers");

    drop(worker);

    // liveness_timeout_ms (300) + sweep_interval_ms (100) plus slack.
    for _ in 0..50 {
        if worker_ids(&coordinator).await.is_empty() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("worker was still listed as active after the liveness timeout elapsed");
}
