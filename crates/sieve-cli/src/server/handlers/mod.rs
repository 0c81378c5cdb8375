//! API request handlers.

mod admin;
mod analyze;
mod fingerprint;
mod health;

pub use admin::*;
pub use analyze::*;
pub use fingerprint::*;
pub use health::*;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use sieve::SieveError;

use crate::server::error::{ApiError, REQUEST_ID_HEADER};

/// Caller correlation id from the request headers, as sent.
///
/// Length is checked later, with the body's own id, during validation.
pub(crate) fn header_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
}

/// Decode a JSON body, mapping transport failures onto the response contract.
///
/// Bodies are taken as raw bytes so that malformed JSON and oversized
/// payloads produce the same envelope as every other error.
pub(crate) fn decode_body<T: DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
    limit: usize,
    request_id: Option<&str>,
) -> Result<T, ApiError> {
    let bytes = match body {
        Ok(bytes) => bytes,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(ApiError::PayloadTooLarge {
                limit,
                request_id: request_id.map(str::to_string),
            });
        }
        Err(rejection) => {
            return Err(ApiError::sieve(
                SieveError::validation("body", rejection.body_text()),
                request_id,
            ));
        }
    };
    serde_json::from_slice(&bytes).map_err(|e| ApiError::sieve(SieveError::Json(e), request_id))
}
