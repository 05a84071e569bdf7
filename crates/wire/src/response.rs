//! Translates [`FabricError`] into an HTTP status + JSON body, the single
//! place every request handler's error path funnels through.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fabric_core::{ErrorKind, FabricError};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: ErrorKind,
    message: String,
}

/// Newtype so the error-to-status mapping lives with the wire layer, not
/// inside `fabric-core` (which has no notion of HTTP).
pub struct ApiError(pub FabricError);

impl From<FabricError> for ApiError {
    fn from(err: FabricError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InfrastructureError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::TimeoutError => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::DecryptionError => StatusCode::BAD_REQUEST,
            ErrorKind::ProtocolError => StatusCode::BAD_REQUEST,
            ErrorKind::Cancelled => StatusCode::CONFLICT,
        };
        (status, Json(ErrorBody { kind: self.0.kind, message: self.0.message })).into_response()
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
