use crate::support::Coordinator;

#[tokio::test]
async fn disallowed_cli_command_is_rejected_before_a_job_is_created() {
    let coordinator = Coordinator::spawn().await;

    let body = serde_json::json!({"mode": "cli", "payload": "rm -rf /"});
    let response = coordinator.client.post(coordinator.url("/submit")).json(&body).send().await.expect("submit request");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let error: serde_json::Value = response.json().await.expect("error body");
    assert_eq!(error["kind"], "validation-error");
    assert!(error.get("job_id").is_none(), "rejected submission must not carry a job id: {error}");
}
