//! Fingerprint-only handler.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use sieve::{AnalyzeRequest, FileType, SchemaFingerprint};

use super::{decode_body, header_request_id};
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Response for the fingerprint endpoint.
#[derive(Serialize)]
pub struct FingerprintResponse {
    pub request_id: String,
    pub file_type: FileType,
    pub truncated: bool,
    pub content_hash: String,
    /// Stable digest used as cache-key material.
    pub digest: String,
    pub fingerprint: SchemaFingerprint,
}

/// Fingerprint a document without calling the reasoning provider.
pub async fn fingerprint(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<FingerprintResponse>, ApiError> {
    let header_id = header_request_id(&headers);
    let mut request: AnalyzeRequest =
        decode_body(body, state.body_limit, header_id.as_deref())?;
    if request.request_id.is_none() {
        request.request_id = header_id;
    }

    let request_id = request.resolve_request_id();
    let validated = request
        .validate(request_id.clone(), &state.inspector.config().request)
        .map_err(|e| ApiError::sieve(e, Some(&request_id)))?;

    let fingerprint = state
        .inspector
        .fingerprint(validated.file_type, &validated.content);

    tracing::debug!(
        request_id = %request_id,
        file_type = %validated.file_type,
        records = fingerprint.record_count,
        issues = fingerprint.issues.len(),
        "Fingerprinted document"
    );

    Ok(Json(FingerprintResponse {
        request_id: validated.request_id,
        file_type: validated.file_type,
        truncated: validated.truncated,
        content_hash: validated.content_hash,
        digest: fingerprint.digest(),
        fingerprint,
    }))
}
