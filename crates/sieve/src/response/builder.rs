//! Constructs the three response variants.

use serde_json::Value;

use crate::error::SieveError;
use crate::fingerprint::{FileType, SchemaFingerprint};
use crate::normalize::{normalize_errors, NormalizerConfig};
use crate::redact::Redactor;

use super::types::{
    Environment, ErrorKind, ErrorResponse, NormalizedResponse, ParseFailureResponse, Provenance,
    ResponseMeta, SuccessResponse,
};

/// Fixed message for throttled requests.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please wait before trying again.";

/// Response builder configuration.
#[derive(Debug, Clone)]
pub struct ResponseConfig {
    /// Raw upstream output is only attached outside production.
    pub environment: Environment,
    /// Backoff used when a throttling signal carries no retry hint.
    pub default_retry_after_secs: u64,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            default_retry_after_secs: 60,
        }
    }
}

/// Per-request metadata gathered by the caller.
#[derive(Debug, Clone)]
pub struct AnalysisMetadata {
    pub request_id: String,
    pub file_type: FileType,
    pub truncated: bool,
    /// Wall time in milliseconds; rounded when the response is built.
    pub analysis_time_ms: f64,
    pub cached: bool,
    pub content_hash: Option<String>,
    pub provenance: Provenance,
    pub fingerprint: Option<SchemaFingerprint>,
}

impl AnalysisMetadata {
    pub fn new(request_id: impl Into<String>, file_type: FileType) -> Self {
        Self {
            request_id: request_id.into(),
            file_type,
            truncated: false,
            analysis_time_ms: 0.0,
            cached: false,
            content_hash: None,
            provenance: Provenance::default(),
            fingerprint: None,
        }
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn with_analysis_time_ms(mut self, ms: f64) -> Self {
        self.analysis_time_ms = ms;
        self
    }

    pub fn with_cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }

    pub fn with_content_hash(mut self, hash: impl Into<String>) -> Self {
        self.content_hash = Some(hash.into());
        self
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: SchemaFingerprint) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    fn meta(&self) -> ResponseMeta {
        ResponseMeta {
            request_id: self.request_id.clone(),
            file_type: self.file_type,
            truncated: self.truncated,
            analysis_time_ms: round_ms(self.analysis_time_ms),
            cached: self.cached,
        }
    }
}

/// Inputs for an `error` response. `details` is redacted on construction.
#[derive(Debug, Clone, Default)]
pub struct ErrorParts {
    pub kind: ErrorKind,
    pub message: String,
    pub details: Option<String>,
    pub suggestions: Vec<String>,
    pub fix: Option<String>,
    pub retry_after: Option<u64>,
    pub request_id: Option<String>,
}

impl ErrorParts {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    pub fn with_request_id(mut self, request_id: Option<&str>) -> Self {
        self.request_id = request_id.map(str::to_string);
        self
    }
}

/// Builds [`NormalizedResponse`] values. Every method is pure and total.
#[derive(Debug, Clone, Default)]
pub struct ResponseBuilder {
    config: ResponseConfig,
    normalizer: NormalizerConfig,
    redactor: Redactor,
}

impl ResponseBuilder {
    pub fn new(config: ResponseConfig, normalizer: NormalizerConfig, redactor: Redactor) -> Self {
        Self {
            config,
            normalizer,
            redactor,
        }
    }

    pub fn config(&self) -> &ResponseConfig {
        &self.config
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    /// Success response from the raw upstream error list.
    ///
    /// Counts come from the normalized list, which is the only place the
    /// `warning` tag is decided.
    pub fn success(
        &self,
        raw_errors: &[Value],
        metadata: AnalysisMetadata,
        raw_response: Option<&str>,
    ) -> NormalizedResponse {
        let errors = normalize_errors(raw_errors, &self.normalizer);
        let total_warnings = errors.iter().filter(|e| e.is_warning()).count();
        let total_errors = errors.len() - total_warnings;

        let raw_response = if self.config.environment.is_production() {
            None
        } else {
            raw_response.map(str::to_string)
        };

        NormalizedResponse::Ok(SuccessResponse {
            meta: metadata.meta(),
            total_errors,
            total_warnings,
            errors,
            content_hash: metadata.content_hash,
            provenance: metadata.provenance,
            fingerprint: metadata.fingerprint,
            raw_response,
        })
    }

    /// Re-serve a stored success result under a new request.
    pub fn from_cache(
        &self,
        stored: &SuccessResponse,
        request_id: &str,
        analysis_time_ms: f64,
    ) -> NormalizedResponse {
        let mut meta = stored.meta.clone();
        meta.request_id = request_id.to_string();
        meta.analysis_time_ms = round_ms(analysis_time_ms);
        meta.cached = true;

        NormalizedResponse::Ok(SuccessResponse {
            meta,
            raw_response: if self.config.environment.is_production() {
                None
            } else {
                stored.raw_response.clone()
            },
            ..stored.clone()
        })
    }

    /// Upstream answered, but not with something readable as a result.
    pub fn parse_failure(
        &self,
        metadata: AnalysisMetadata,
        raw_response: &str,
        hints: Vec<String>,
    ) -> NormalizedResponse {
        NormalizedResponse::LlmParseError(ParseFailureResponse::new(
            metadata.meta(),
            raw_response.to_string(),
            hints,
        ))
    }

    /// Error response; `details` always goes through redaction.
    pub fn error(&self, parts: ErrorParts) -> NormalizedResponse {
        NormalizedResponse::Error(ErrorResponse {
            request_id: parts.request_id,
            error_type: parts.kind,
            message: parts.message,
            details: parts.details.map(|d| self.redactor.redact_details(&d)),
            suggestions: if parts.suggestions.is_empty() {
                None
            } else {
                Some(parts.suggestions)
            },
            fix: parts.fix,
            retry_after: parts.retry_after,
        })
    }

    /// Client-side validation failure with a fix hint.
    pub fn validation_error(
        &self,
        message: impl Into<String>,
        fix: impl Into<String>,
        request_id: Option<&str>,
    ) -> NormalizedResponse {
        self.error(
            ErrorParts::new(ErrorKind::ValidationError, message)
                .with_fix(fix)
                .with_request_id(request_id),
        )
    }

    /// Throttling response. `retry_after` defaults to the configured backoff.
    pub fn rate_limited(&self, retry_after: Option<u64>, request_id: Option<&str>) -> NormalizedResponse {
        let retry_after = retry_after.unwrap_or(self.config.default_retry_after_secs);
        self.error(ErrorParts {
            retry_after: Some(retry_after),
            ..ErrorParts::new(ErrorKind::RateLimitExceeded, RATE_LIMIT_MESSAGE)
                .with_suggestion(format!("Retry after {} seconds", retry_after))
                .with_request_id(request_id)
        })
    }

    /// Map a library error onto the error taxonomy.
    pub fn from_error(&self, err: &SieveError, request_id: Option<&str>) -> NormalizedResponse {
        let parts = match err {
            SieveError::RateLimited { retry_after } => {
                return self.rate_limited(*retry_after, request_id);
            }
            SieveError::Validation { field, message } => {
                ErrorParts::new(ErrorKind::ValidationError, format!("Invalid {}: {}", field, message))
                    .with_fix(format!("Check the '{}' field and resend the request", field))
            }
            SieveError::UnsupportedFileType(value) => ErrorParts::new(
                ErrorKind::ValidationError,
                format!("Unsupported file type: {}", value),
            )
            .with_fix(format!("Use one of: {}", FileType::valid_values())),
            SieveError::Json(e) => ErrorParts::new(ErrorKind::ValidationError, "Malformed JSON body")
                .with_details(e.to_string())
                .with_fix("Send a valid JSON object"),
            SieveError::Unauthorized(message) => {
                ErrorParts::new(ErrorKind::Unauthorized, message.clone())
            }
            SieveError::Provider(message) => {
                ErrorParts::new(ErrorKind::UpstreamError, "The analysis provider failed")
                    .with_details(message.clone())
                    .with_suggestion("Retry the request; if it keeps failing, try a smaller file")
            }
            SieveError::ProviderTimeout(_) => {
                ErrorParts::new(ErrorKind::UpstreamTimeout, "The analysis provider timed out")
                    .with_details(err.to_string())
                    .with_suggestion("Retry with a smaller file")
            }
            SieveError::Io { .. } | SieveError::Cache(_) | SieveError::Config(_) => {
                ErrorParts::new(ErrorKind::InternalError, "Internal server error")
                    .with_details(err.to_string())
            }
        };
        self.error(parts.with_request_id(request_id))
    }
}

/// Round to the nearest millisecond, clamping negatives and NaN to zero.
fn round_ms(ms: f64) -> u64 {
    if ms.is_finite() && ms > 0.0 {
        ms.round() as u64
    } else {
        0
    }
}
