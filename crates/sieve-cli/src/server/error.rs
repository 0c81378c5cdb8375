//! API error types and handling.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use sieve::response::ErrorParts;
use sieve::{ErrorKind, NormalizedResponse, ResponseBuilder, SieveError};

/// Correlation header echoed on every response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Set to `HIT` when a result was served from cache.
pub const CACHE_HEADER: &str = "x-cache";

/// A [`NormalizedResponse`] on the wire: status code and transport headers
/// are derived from the payload.
pub struct ApiResponse(pub NormalizedResponse);

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let body = self.0;
        let status =
            StatusCode::from_u16(body.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let request_id = body.request_id().and_then(|id| HeaderValue::from_str(id).ok());
        let cached = body.is_cached();
        let retry_after = body.retry_after();

        let mut response = (status, Json(body)).into_response();
        let headers = response.headers_mut();
        if let Some(id) = request_id {
            headers.insert(REQUEST_ID_HEADER, id);
        }
        if cached {
            headers.insert(CACHE_HEADER, HeaderValue::from_static("HIT"));
        }
        if let Some(secs) = retry_after {
            headers.insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Request body exceeded the transport limit.
    PayloadTooLarge {
        limit: usize,
        request_id: Option<String>,
    },
    /// The blocking analysis task could not complete.
    Internal {
        message: String,
        request_id: Option<String>,
    },
    /// Error from the sieve library.
    Sieve {
        error: SieveError,
        request_id: Option<String>,
    },
}

impl ApiError {
    pub fn sieve(error: SieveError, request_id: Option<&str>) -> Self {
        ApiError::Sieve {
            error,
            request_id: request_id.map(str::to_string),
        }
    }

    fn to_normalized(&self) -> NormalizedResponse {
        let builder = ResponseBuilder::default();
        match self {
            ApiError::PayloadTooLarge { limit, request_id } => builder.error(
                ErrorParts::new(ErrorKind::PayloadTooLarge, "Request body too large")
                    .with_fix(format!("Send at most {} bytes", limit))
                    .with_request_id(request_id.as_deref()),
            ),
            ApiError::Internal { message, request_id } => builder.error(
                ErrorParts::new(ErrorKind::InternalError, "Internal server error")
                    .with_details(message.clone())
                    .with_request_id(request_id.as_deref()),
            ),
            ApiError::Sieve { error, request_id } => builder.from_error(error, request_id.as_deref()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ApiResponse(self.to_normalized()).into_response()
    }
}

impl From<SieveError> for ApiError {
    fn from(err: SieveError) -> Self {
        ApiError::Sieve {
            error: err,
            request_id: None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::PayloadTooLarge { limit, .. } => {
                write!(f, "Payload too large: limit is {} bytes", limit)
            }
            ApiError::Internal { message, .. } => write!(f, "Internal error: {}", message),
            ApiError::Sieve { error, .. } => write!(f, "Sieve error: {}", error),
        }
    }
}

impl std::error::Error for ApiError {}
