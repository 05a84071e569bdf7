//! Session state and offer/answer/ICE-candidate relay for the peer-to-peer
//! data channel handshake. The coordinator that wires this crate in never
//! inspects, stores, or rewrites the payloads it relays.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod plane;

pub use error::SignalingError;
pub use plane::{Endpoint, SignalingPlane};
