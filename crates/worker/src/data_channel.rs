//! Direct peer-to-peer data-channel server: the client connects here once
//! signaling has told it this worker's endpoint, bootstraps the secure
//! channel, then sends one encrypted task and receives one encrypted
//! result. One connection serves exactly one job.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use fabric_core::{JobStatus, JobSubmission, SystemClock};
use fabric_crypto::{ChannelState, SecureChannel};
use fabric_engine::Engine;
use futures_util::{SinkExt, StreamExt};

use crate::protocol::{DataChannelFrame, KeyExchangeAction, RESULT_AAD, TASK_AAD};

pub fn router(engine: Engine<SystemClock>) -> Router {
    Router::new().route("/data-channel/:session_id", get(upgrade)).with_state(Arc::new(engine))
}

async fn upgrade(
    ws: WebSocketUpgrade,
    State(engine): State<Arc<Engine<SystemClock>>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve(socket, engine, session_id))
}

async fn serve(socket: WebSocket, engine: Arc<Engine<SystemClock>>, session_id: String) {
    let (mut sink, mut stream) = socket.split();
    let mut channel = SecureChannel::new();

    while channel.state() != ChannelState::SymmetricKeyEstablished {
        let Some(Ok(Message::Text(text))) = stream.next().await else {
            tracing::warn!(%session_id, "data channel closed during key exchange");
            return;
        };
        let Ok(frame) = serde_json::from_str::<DataChannelFrame>(&text) else {
            tracing::warn!(%session_id, "malformed key-exchange frame, closing session");
            return;
        };
        match frame {
            DataChannelFrame::KeyExchange { action: KeyExchangeAction::SendPublicKey, public_key: Some(key), .. } => {
                if channel.receive_public_key(&key).is_err() {
                    tracing::warn!(%session_id, "failed to decode client public key");
                    return;
                }
                let Ok(reply_key) = channel.local_public_key_base64() else { return };
                let reply = DataChannelFrame::KeyExchange {
                    action: KeyExchangeAction::SendPublicKey,
                    public_key: Some(reply_key),
                    encrypted_aes_key: None,
                };
                if send(&mut sink, &reply).await.is_err() {
                    return;
                }
            }
            DataChannelFrame::KeyExchange { action: KeyExchangeAction::SendAesKey, encrypted_aes_key: Some(wrapped), .. } => {
                if channel.unwrap_key(&wrapped).is_err() {
                    tracing::warn!(%session_id, "failed to unwrap symmetric key, closing session");
                    return;
                }
                let ack = DataChannelFrame::KeyExchange {
                    action: KeyExchangeAction::AesKeyReceived,
                    public_key: None,
                    encrypted_aes_key: None,
                };
                if send(&mut sink, &ack).await.is_err() {
                    return;
                }
            }
            _ => {
                tracing::warn!(%session_id, "unexpected frame during key exchange, closing session");
                return;
            }
        }
    }

    let Some(Ok(Message::Text(text))) = stream.next().await else {
        tracing::warn!(%session_id, "data channel closed before task arrived");
        return;
    };
    let task_frame: DataChannelFrame = match serde_json::from_str(&text) {
        Ok(f) => f,
        Err(_) => {
            tracing::warn!(%session_id, "malformed task frame, closing session");
            return;
        }
    };
    let DataChannelFrame::EncryptedTask { encrypted_data } = task_frame else {
        tracing::warn!(%session_id, "expected encrypted-task frame, closing session");
        return;
    };

    let plaintext = match channel.decrypt(&encrypted_data, TASK_AAD) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!(%session_id, "task decryption failed, tearing down session");
            return;
        }
    };
    let submission: JobSubmission = match serde_json::from_slice(&plaintext) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(%session_id, error = %e, "task payload was not a valid job submission");
            return;
        }
    };

    let snapshot = match engine.submit(submission) {
        Ok(job_id) => poll_until_terminal(&engine, job_id).await,
        Err(e) => {
            tracing::warn!(%session_id, error = %e, "direct task submission rejected");
            return;
        }
    };

    let Ok(result_bytes) = serde_json::to_vec(&snapshot) else { return };
    let Ok(encrypted_result) = channel.encrypt(&result_bytes, RESULT_AAD) else { return };
    let _ = send(&mut sink, &DataChannelFrame::EncryptedResult { encrypted_data: encrypted_result }).await;
}

async fn poll_until_terminal(engine: &Engine<SystemClock>, job_id: fabric_core::JobId) -> fabric_core::JobSnapshot {
    loop {
        match engine.status(job_id) {
            Ok(snapshot) if matches!(snapshot.status, JobStatus::Completed | JobStatus::Failed) => return snapshot,
            Ok(_) => tokio::time::sleep(std::time::Duration::from_millis(200)).await,
            Err(_) => {
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            }
        }
    }
}

async fn send(
    sink: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    frame: &DataChannelFrame,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(frame).unwrap_or_default();
    sink.send(Message::Text(text)).await
}
