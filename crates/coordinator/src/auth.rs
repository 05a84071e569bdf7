//! Bearer-token gate shared by every request handler.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use crate::state::AppState;

pub fn check(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, &'static str)> {
    let Some(key) = &state.auth_token else { return Ok(()) };

    let header = headers.get("Authorization").ok_or((StatusCode::UNAUTHORIZED, "missing authorization"))?;
    let value = header.to_str().map_err(|_| (StatusCode::UNAUTHORIZED, "invalid authorization header"))?;
    match value.strip_prefix("Bearer ") {
        Some(token) if token == key => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, "invalid bearer token")),
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    use axum::response::IntoResponse;
    if let Err((status, message)) = check(&state, &headers) {
        return (status, message).into_response();
    }
    next.run(request).await
}
