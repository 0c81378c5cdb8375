//! Canonical response shapes returned to callers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SieveError;
use crate::fingerprint::{FileType, SchemaFingerprint};
use crate::normalize::NormalizedError;

/// Deployment environment; controls whether raw upstream output is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(SieveError::Config(format!(
                "Unknown environment: {}. Use development, test, or production.",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Taxonomy tag for the `error` response variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    Unauthorized,
    NotFound,
    PayloadTooLarge,
    RateLimitExceeded,
    UpstreamError,
    UpstreamTimeout,
    #[default]
    InternalError,
}

impl ErrorKind {
    /// HTTP status the transport layer should use.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::ValidationError => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::NotFound => 404,
            ErrorKind::PayloadTooLarge => 413,
            ErrorKind::RateLimitExceeded => 429,
            ErrorKind::InternalError => 500,
            ErrorKind::UpstreamError => 502,
            ErrorKind::UpstreamTimeout => 504,
        }
    }

    /// True for 4xx kinds caused by the caller.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Pass/fail counts from post-analysis sanity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SanityChecks {
    pub passed: usize,
    pub failed: usize,
}

/// Where a result came from.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Provenance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rag_used: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanity_checks: Option<SanityChecks>,
}

/// Fields shared by the `ok` and `llm_parse_error` variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub file_type: FileType,
    pub truncated: bool,
    pub analysis_time_ms: u64,
    pub cached: bool,
}

/// `status: "ok"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub errors: Vec<NormalizedError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(flatten)]
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<SchemaFingerprint>,
    /// Only populated outside production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// `status: "llm_parse_error"`: upstream answered but the answer could not be
/// read as a result. Counts are zero and the list empty by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseFailureResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    total_errors: usize,
    total_warnings: usize,
    errors: Vec<NormalizedError>,
    pub raw_response: String,
    pub hints: Vec<String>,
}

impl ParseFailureResponse {
    pub(crate) fn new(meta: ResponseMeta, raw_response: String, hints: Vec<String>) -> Self {
        Self {
            meta,
            total_errors: 0,
            total_warnings: 0,
            errors: Vec::new(),
            raw_response,
            hints,
        }
    }
}

/// `status: "error"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub error_type: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// The only values serialized back to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NormalizedResponse {
    Ok(SuccessResponse),
    LlmParseError(ParseFailureResponse),
    Error(ErrorResponse),
}

impl NormalizedResponse {
    /// HTTP status for the transport layer.
    pub fn status_code(&self) -> u16 {
        match self {
            NormalizedResponse::Ok(_) | NormalizedResponse::LlmParseError(_) => 200,
            NormalizedResponse::Error(e) => e.error_type.status_code(),
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            NormalizedResponse::Ok(r) => Some(&r.meta.request_id),
            NormalizedResponse::LlmParseError(r) => Some(&r.meta.request_id),
            NormalizedResponse::Error(r) => r.request_id.as_deref(),
        }
    }

    pub fn is_cached(&self) -> bool {
        match self {
            NormalizedResponse::Ok(r) => r.meta.cached,
            NormalizedResponse::LlmParseError(r) => r.meta.cached,
            NormalizedResponse::Error(_) => false,
        }
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            NormalizedResponse::Error(r) => r.retry_after,
            _ => None,
        }
    }

    /// Wire tag of the variant.
    pub fn status(&self) -> &'static str {
        match self {
            NormalizedResponse::Ok(_) => "ok",
            NormalizedResponse::LlmParseError(_) => "llm_parse_error",
            NormalizedResponse::Error(_) => "error",
        }
    }
}
