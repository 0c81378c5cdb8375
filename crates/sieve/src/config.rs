//! Top-level configuration.

use crate::fingerprint::FingerprintConfig;
use crate::normalize::NormalizerConfig;
use crate::redact::RedactionConfig;
use crate::request::RequestConfig;
use crate::response::{Environment, ResponseConfig};

/// Configuration for the inspection pipeline.
#[derive(Debug, Clone, Default)]
pub struct SieveConfig {
    /// Sample bound for fingerprinting.
    pub fingerprint: FingerprintConfig,
    /// Default error type for unclassified records.
    pub normalizer: NormalizerConfig,
    /// Truncation limits for logs and error details.
    pub redaction: RedactionConfig,
    /// Environment and retry defaults.
    pub response: ResponseConfig,
    /// Inbound size cap.
    pub request: RequestConfig,
}

impl SieveConfig {
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.response.environment = environment;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.fingerprint.sample_size = sample_size;
        self
    }

    pub fn with_max_content_bytes(mut self, max_content_bytes: usize) -> Self {
        self.request.max_content_bytes = max_content_bytes;
        self
    }
}
