//! The inspection pipeline and its public entry point.

use std::sync::Arc;
use std::time::Instant;

use crate::cache::{CacheKey, CacheStore};
use crate::config::SieveConfig;
use crate::fingerprint::{self, FileType, SchemaFingerprint};
use crate::provider::{parse_upstream_output, ReasoningProvider, ReasoningRequest};
use crate::redact::Redactor;
use crate::request::AnalyzeRequest;
use crate::response::{AnalysisMetadata, NormalizedResponse, Provenance, ResponseBuilder, SuccessResponse};

/// Runs one analyze request end to end.
///
/// validate → fingerprint → cache lookup → provider → parse → normalize →
/// cache store. Every outcome, including failures, is a [`NormalizedResponse`].
pub struct Inspector {
    config: SieveConfig,
    builder: ResponseBuilder,
    redactor: Redactor,
    provider: Arc<dyn ReasoningProvider>,
    cache: Option<Arc<dyn CacheStore>>,
}

impl Inspector {
    /// Create an inspector with default configuration.
    pub fn new(provider: Arc<dyn ReasoningProvider>) -> Self {
        Self::with_config(provider, SieveConfig::default())
    }

    /// Create an inspector with custom configuration.
    pub fn with_config(provider: Arc<dyn ReasoningProvider>, config: SieveConfig) -> Self {
        let redactor = Redactor::with_config(config.redaction.clone());
        let builder = ResponseBuilder::new(
            config.response.clone(),
            config.normalizer.clone(),
            redactor.clone(),
        );
        Self {
            config,
            builder,
            redactor,
            provider,
            cache: None,
        }
    }

    /// Serve repeated requests from a cache store.
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &SieveConfig {
        &self.config
    }

    pub fn builder(&self) -> &ResponseBuilder {
        &self.builder
    }

    pub fn provider(&self) -> &dyn ReasoningProvider {
        self.provider.as_ref()
    }

    /// Fingerprint content with the configured sample bound.
    pub fn fingerprint(&self, file_type: FileType, content: &str) -> SchemaFingerprint {
        fingerprint::fingerprint(file_type, content, &self.config.fingerprint)
    }

    /// Inspect one request. Blocks for the duration of the provider call.
    pub fn inspect(&self, request: AnalyzeRequest) -> NormalizedResponse {
        let started = Instant::now();
        let request_id = request.resolve_request_id();

        let validated = match request.validate(request_id.clone(), &self.config.request) {
            Ok(v) => v,
            Err(e) => {
                tracing::info!(
                    request_id = %request_id,
                    error = %self.redactor.redact_for_log(&e.to_string()),
                    "Rejected analyze request"
                );
                return self.builder.from_error(&e, Some(&request_id));
            }
        };

        let fingerprint = self.fingerprint(validated.file_type, &validated.content);
        let key = CacheKey::new(validated.file_type, &validated.content_hash, &fingerprint);

        if let Some(stored) = self.lookup(&key, &request_id) {
            tracing::debug!(request_id = %request_id, key = %key, "Cache hit");
            return self.builder.from_cache(&stored, &request_id, elapsed_ms(started));
        }

        let metadata = AnalysisMetadata::new(&request_id, validated.file_type)
            .with_truncated(validated.truncated)
            .with_content_hash(&validated.content_hash)
            .with_fingerprint(fingerprint.clone());

        let reasoning = ReasoningRequest {
            request_id: request_id.clone(),
            file_type: validated.file_type,
            content: validated.content,
            fingerprint,
        };

        let output = match self.provider.analyze(&reasoning) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    provider = self.provider.name(),
                    error = %self.redactor.redact_for_log(&e.to_string()),
                    "Provider call failed"
                );
                return self.builder.from_error(&e, Some(&request_id));
            }
        };

        let provenance = Provenance {
            llm_provider: Some(self.provider.name().to_string()),
            llm_model: Some(output.model.clone()),
            tokens_used: output.tokens_used,
            ..Provenance::default()
        };

        match parse_upstream_output(&output.raw_text) {
            Ok(parsed) => {
                let provenance = Provenance {
                    rag_used: parsed.rag_used,
                    sanity_checks: parsed.sanity_checks,
                    ..provenance
                };
                let response = self.builder.success(
                    &parsed.errors,
                    metadata
                        .with_provenance(provenance)
                        .with_analysis_time_ms(elapsed_ms(started)),
                    Some(&output.raw_text),
                );
                if let NormalizedResponse::Ok(ok) = &response {
                    self.store(&key, ok, &request_id);
                    tracing::info!(
                        request_id = %request_id,
                        file_type = %ok.meta.file_type,
                        total_errors = ok.total_errors,
                        total_warnings = ok.total_warnings,
                        analysis_time_ms = ok.meta.analysis_time_ms,
                        "Analysis complete"
                    );
                }
                response
            }
            Err(hints) => {
                tracing::warn!(
                    request_id = %request_id,
                    hints = hints.len(),
                    raw = %self.redactor.redact_for_log(&output.raw_text),
                    "Provider output could not be parsed"
                );
                self.builder.parse_failure(
                    metadata.with_analysis_time_ms(elapsed_ms(started)),
                    &output.raw_text,
                    hints,
                )
            }
        }
    }

    // Cache faults never fail a request; they are logged and treated as misses.
    fn lookup(&self, key: &CacheKey, request_id: &str) -> Option<SuccessResponse> {
        let cache = self.cache.as_ref()?;
        cache.get(key).unwrap_or_else(|e| {
            tracing::warn!(request_id = %request_id, error = %e, "Cache lookup failed");
            None
        })
    }

    fn store(&self, key: &CacheKey, response: &SuccessResponse, request_id: &str) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(key, response) {
                tracing::warn!(request_id = %request_id, error = %e, "Cache store failed");
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
