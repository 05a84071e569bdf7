//! The bidirectional event channel: workers register and heartbeat over
//! it, clients and workers relay signaling frames through it, and every
//! connection receives the coordinator-wide event broadcast.
//!
//! The REST surface has no `/register` or `/heartbeat` endpoint — per the
//! event-channel description, that traffic rides this socket. A worker's
//! periodic re-announcement of [`InboundMessage::WorkerRegistered`] is
//! what keeps its registry entry's last-heartbeat fresh; the registry's
//! `register` upsert already refreshes that timestamp on every call.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use fabric_core::{Event, SessionId, SignalingPayload, WorkerDescriptor, WorkerId};
use fabric_signaling::Endpoint;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::state::AppState;

/// Frames a connection may send inbound. The outbound direction reuses
/// [`Event`] directly — only the inbound side needs extra addressing
/// (`worker_id`, `client`) that a relay event alone doesn't carry, since
/// offer/answer/candidate initiation needs to name the other endpoint.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum InboundMessage {
    WorkerRegistered { worker: WorkerDescriptor },
    SessionOffer { session_id: SessionId, worker_id: WorkerId, client: String, sdp: String },
    SessionAnswer { session_id: SessionId, sdp: String },
    IceCandidate { session_id: SessionId, from: InboundEndpoint, candidate: String, sdp_mid: Option<String>, sdp_mline_index: Option<u16> },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum InboundEndpoint {
    Client,
    Worker,
}

impl From<InboundEndpoint> for Endpoint {
    fn from(e: InboundEndpoint) -> Self {
        match e {
            InboundEndpoint::Client => Endpoint::Client,
            InboundEndpoint::Worker => Endpoint::Worker,
        }
    }
}

pub async fn handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run(socket, state))
}

async fn run(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let mut events = state.events.subscribe();
    let mut worker_rx: Option<mpsc::UnboundedReceiver<(SessionId, SignalingPayload)>> = None;
    let mut registered_worker: Option<WorkerId> = None;

    loop {
        tokio::select! {
            incoming = stream.next() => {
                let Some(Ok(Message::Text(text))) = incoming else { break };
                let Ok(inbound) = serde_json::from_str::<InboundMessage>(&text) else {
                    tracing::debug!("dropped malformed event-channel frame");
                    continue;
                };
                match inbound {
                    InboundMessage::WorkerRegistered { worker } => {
                        let id = worker.id;
                        if state.registry.register(worker.clone()).is_ok() {
                            if worker_rx.is_none() {
                                worker_rx = Some(state.signaling.connect_worker(id));
                            }
                            registered_worker = Some(id);
                            let _ = state.events.send(Event::WorkerRegistered { worker });
                            let _ = send(&mut sink, &Event::HeartbeatAck).await;
                        }
                    }
                    InboundMessage::SessionOffer { session_id, worker_id, client, sdp } => {
                        match state.signaling.offer(session_id, worker_id, client, sdp) {
                            Ok(mut client_rx) => {
                                let events_tx = state.events.clone();
                                tokio::spawn(async move {
                                    while let Some(payload) = client_rx.recv().await {
                                        let _ = events_tx.send(Event::SessionSignaling { session_id, payload });
                                    }
                                });
                            }
                            Err(err) => {
                                tracing::warn!(error = %err, %session_id, "offer rejected");
                            }
                        }
                    }
                    InboundMessage::SessionAnswer { session_id, sdp } => {
                        if let Err(err) = state.signaling.answer(session_id, sdp) {
                            tracing::warn!(error = %err, %session_id, "answer rejected");
                        }
                    }
                    InboundMessage::IceCandidate { session_id, from, candidate, sdp_mid, sdp_mline_index } => {
                        state.signaling.relay_candidate(
                            session_id,
                            from.into(),
                            SignalingPayload::IceCandidate { candidate, sdp_mid, sdp_mline_index },
                        );
                    }
                }
            }
            Some((session_id, payload)) = recv_from_worker(&mut worker_rx) => {
                let _ = send(&mut sink, &Event::SessionSignaling { session_id, payload }).await;
            }
            Ok(event) = events.recv() => {
                if send(&mut sink, &event).await.is_err() {
                    break;
                }
            }
            else => break,
        }
    }

    if let Some(id) = registered_worker {
        let closed = state.signaling.disconnect_worker(&id);
        if !closed.is_empty() {
            tracing::info!(worker_id = %id, sessions = closed.len(), "worker disconnected, sessions closed");
        }
    }
}

async fn recv_from_worker(
    rx: &mut Option<mpsc::UnboundedReceiver<(SessionId, SignalingPayload)>>,
) -> Option<(SessionId, SignalingPayload)> {
    match rx {
        Some(r) => r.recv().await,
        None => std::future::pending().await,
    }
}

async fn send(
    sink: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    event: &Event,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(event).unwrap_or_default();
    sink.send(Message::Text(text)).await
}
