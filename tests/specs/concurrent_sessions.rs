use fabric_crypto::SecureChannel;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use crate::support::{Coordinator, Worker};

const TASK_AAD: &[u8] = b"encrypted-task";
const RESULT_AAD: &[u8] = b"encrypted-result";

/// Runs one client's encrypted session against the worker's data channel:
/// key exchange, one task, one result. Returns the decrypted job snapshot.
async fn run_client(port: u16, session_id: &str, print_text: &str) -> serde_json::Value {
    let url = format!("ws://127.0.0.1:{port}/data-channel/{session_id}");
    let (mut ws, _) = tokio_tungstenite::connect_async(&url).await.expect("connect to data channel");

    let mut channel = SecureChannel::new();
    let our_key = channel.local_public_key_base64().expect("generate client keypair");
    ws.send(Message::Text(
        serde_json::json!({"type": "key-exchange", "action": "send-public-key", "public-key": our_key}).to_string(),
    ))
    .await
    .expect("send public key");

    let reply = next_json(&mut ws).await;
    let worker_key = reply["public-key"].as_str().expect("worker public key in reply");
    channel.receive_public_key(worker_key).expect("record worker public key");

    let wrapped = channel.generate_and_wrap_key().expect("wrap session key");
    ws.send(Message::Text(
        serde_json::json!({"type": "key-exchange", "action": "send-aes-key", "encrypted-aes-key": wrapped}).to_string(),
    ))
    .await
    .expect("send wrapped key");

    let ack = next_json(&mut ws).await;
    assert_eq!(ack["action"], "aes-key-received");

    let submission = serde_json::json!({"mode": "script", "payload": format!("print('{print_text}')\n")});
    let encrypted_task = channel.encrypt(submission.to_string().as_bytes(), TASK_AAD).expect("encrypt task");
    ws.send(Message::Text(serde_json::json!({"type": "encrypted-task", "encrypted-data": encrypted_task}).to_string()))
        .await
        .expect("send encrypted task");

    let result_frame = next_json(&mut ws).await;
    let encrypted_result = result_frame["encrypted-data"].as_str().expect("encrypted-data in result frame");
    let plaintext = channel.decrypt(encrypted_result, RESULT_AAD).expect("decrypt result");
    serde_json::from_slice(&plaintext).expect("result is a job snapshot")
}

async fn next_json(
    ws: &mut tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
) -> serde_json::Value {
    match ws.next().await {
        Some(Ok(Message::Text(text))) => serde_json::from_str(&text).expect("frame is valid json"),
        other => panic!("expected a text frame, got {other:?}"),
    }
}

#[tokio::test]
async fn two_concurrent_clients_each_get_only_their_own_result() {
    let coordinator = Coordinator::spawn().await;
    let worker = Worker::spawn(&coordinator).await;

    let (first, second) = tokio::join!(
        run_client(worker.data_channel_port, "ses-concurrent-a", "alice"),
        run_client(worker.data_channel_port, "ses-concurrent-b", "bob"),
    );

    assert_eq!(first["status"], "completed");
    assert_eq!(second["status"], "completed");

    let first_log = first["log_tail"].as_array().expect("log_tail array");
    let second_log = second["log_tail"].as_array().expect("log_tail array");
    let mentions = |lines: &[serde_json::Value], needle: &str| {
        lines.iter().any(|line| line["text"].as_str().unwrap_or("").contains(needle))
    };
    assert!(mentions(first_log, "alice"));
    assert!(!mentions(first_log, "bob"));
    assert!(mentions(second_log, "bob"));
    assert!(!mentions(second_log, "alice"));
}
