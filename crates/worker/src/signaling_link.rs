//! Outbound connection to the coordinator's event channel: registers this
//! worker, re-announces on a heartbeat cadence, and answers signaling
//! offers with this worker's direct data-channel endpoint so the client
//! can dial in without the coordinator brokering the payload itself.

use std::time::Duration;

use fabric_core::{Event, SignalingPayload, WorkerDescriptor};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::Message;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

/// Mirrors the coordinator's inbound event-channel frame shapes for the
/// subset this worker needs to send or receive.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum Outbound {
    WorkerRegistered { worker: WorkerDescriptor },
    SessionAnswer { session_id: fabric_core::SessionId, sdp: String },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum Inbound {
    SessionSignaling { session_id: fabric_core::SessionId, payload: SignalingPayload },
    HeartbeatAck,
    #[serde(other)]
    Other,
}

pub async fn run(signaling_url: String, descriptor: WorkerDescriptor, data_channel_endpoint: String) {
    loop {
        match connect_once(&signaling_url, &descriptor, &data_channel_endpoint).await {
            Ok(()) => tracing::warn!("signaling connection to coordinator closed, reconnecting"),
            Err(e) => tracing::warn!(error = %e, "signaling connection failed, retrying"),
        }
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}

async fn connect_once(
    signaling_url: &str,
    descriptor: &WorkerDescriptor,
    data_channel_endpoint: &str,
) -> anyhow::Result<()> {
    let (socket, _) = tokio_tungstenite::connect_async(signaling_url).await?;
    let (mut sink, mut stream) = socket.split();

    send(&mut sink, &Outbound::WorkerRegistered { worker: descriptor.clone() }).await?;

    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await; // first tick fires immediately; already registered above

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                send(&mut sink, &Outbound::WorkerRegistered { worker: descriptor.clone() }).await?;
            }
            msg = stream.next() => {
                let Some(msg) = msg else { return Ok(()) };
                let Message::Text(text) = msg? else { continue };
                let Ok(inbound) = serde_json::from_str::<Inbound>(&text) else { continue };
                match inbound {
                    Inbound::SessionSignaling { session_id, payload: SignalingPayload::Offer { .. } } => {
                        let sdp = format!("data-channel={data_channel_endpoint}/data-channel/{session_id}");
                        send(&mut sink, &Outbound::SessionAnswer { session_id, sdp }).await?;
                    }
                    Inbound::SessionSignaling { .. } | Inbound::HeartbeatAck | Inbound::Other => {}
                }
            }
        }
    }
}

async fn send(
    sink: &mut futures_util::stream::SplitSink<
        tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
        Message,
    >,
    frame: &Outbound,
) -> anyhow::Result<()> {
    let text = serde_json::to_string(frame)?;
    sink.send(Message::Text(text)).await?;
    Ok(())
}

#[cfg(test)]
#[path = "signaling_link_tests.rs"]
mod tests;
