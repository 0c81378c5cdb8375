//! Cache administration handler.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::Value;

use sieve::{InvalidationCommand, InvalidationOutcome};

use super::{decode_body, header_request_id};
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Header carrying the shared admin secret.
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Apply a cache invalidation command.
pub async fn invalidate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<InvalidationOutcome>, ApiError> {
    let request_id = header_request_id(&headers);
    let secret = headers
        .get(ADMIN_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    // Authorize before looking at the body.
    if let Err(e) = state.invalidation.authorize(secret) {
        tracing::warn!("Rejected invalidation command: {}", e);
        return Err(ApiError::sieve(e, request_id.as_deref()));
    }

    let body: Value = decode_body(body, state.body_limit, request_id.as_deref())?;
    let outcome = InvalidationCommand::from_value(&body)
        .and_then(|command| state.invalidation.execute(&command))
        .map_err(|e| ApiError::sieve(e, request_id.as_deref()))?;

    Ok(Json(outcome))
}
