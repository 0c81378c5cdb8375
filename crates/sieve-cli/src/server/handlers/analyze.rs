//! Full inspection handler.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::HeaderMap;

use sieve::AnalyzeRequest;

use super::{decode_body, header_request_id};
use crate::server::error::{ApiError, ApiResponse};
use crate::server::state::AppState;

/// Run the inspect pipeline on one document.
///
/// The body's `request_id` wins over the `x-request-id` header.
pub async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<ApiResponse, ApiError> {
    let header_id = header_request_id(&headers);
    let mut request: AnalyzeRequest =
        decode_body(body, state.body_limit, header_id.as_deref())?;
    if request.request_id.is_none() {
        request.request_id = header_id.clone();
    }

    // Provider calls block on network I/O.
    let inspector = state.inspector.clone();
    let response = tokio::task::spawn_blocking(move || inspector.inspect(request))
        .await
        .map_err(|e| ApiError::Internal {
            message: e.to_string(),
            request_id: header_id,
        })?;

    Ok(ApiResponse(response))
}
