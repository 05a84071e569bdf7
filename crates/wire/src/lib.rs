//! REST/event DTOs for the coordinator's HTTP surface, plus the single
//! place [`fabric_core::FabricError`] is translated into an HTTP response.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod dto;
mod response;

pub use dto::{
    CapacityResponse, CreateSessionRequest, HealthResponse, SessionCreatedResponse, SessionExecRequest,
    SubmitResponse, UploadResponse, WorkersResponse,
};
pub use response::ApiError;
