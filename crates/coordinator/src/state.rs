//! Shared handles every request handler and the WS loop borrow from.

use std::path::PathBuf;
use std::sync::Arc;

use fabric_core::{Event, SystemClock};
use fabric_engine::Engine;
use fabric_registry::Registry;
use fabric_signaling::SignalingPlane;
use tokio::sync::broadcast;

use crate::notebook::NotebookSessions;

const EVENT_BUS_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry<SystemClock>>,
    pub signaling: Arc<SignalingPlane<SystemClock>>,
    pub notebook: Arc<NotebookSessions<SystemClock>>,
    pub engine: Engine<SystemClock>,
    pub events: broadcast::Sender<Event>,
    pub auth_token: Option<String>,
    pub liveness_timeout_ms: u64,
    pub uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(
        registry: Arc<Registry<SystemClock>>,
        signaling: Arc<SignalingPlane<SystemClock>>,
        engine: Engine<SystemClock>,
        auth_token: Option<String>,
        liveness_timeout_ms: u64,
        uploads_dir: PathBuf,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self {
            registry,
            signaling,
            notebook: Arc::new(NotebookSessions::new(SystemClock)),
            engine,
            events,
            auth_token,
            liveness_timeout_ms,
            uploads_dir,
        }
    }
}
