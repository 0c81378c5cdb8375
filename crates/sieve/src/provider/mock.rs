//! Mock reasoning provider for testing and offline use.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{json, Value};

use crate::error::{Result, SieveError};

use super::{ProviderConfig, ReasoningOutput, ReasoningProvider, ReasoningRequest};

/// How the mock answers.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Report each fingerprint issue as a structure error.
    FromFingerprint,
    /// Return this text verbatim.
    Fixed(String),
    /// Fail as a throttled upstream would.
    RateLimited(Option<u64>),
    /// Fail with a provider error carrying this message.
    Fail(String),
}

/// Mock provider that returns predictable responses for testing.
pub struct MockProvider {
    config: ProviderConfig,
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::FromFingerprint)
    }

    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            config: ProviderConfig::default().with_model("mock-1"),
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Mock that always answers with `raw`.
    pub fn fixed(raw: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Fixed(raw.into()))
    }

    /// Number of `analyze` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ReasoningProvider for MockProvider {
    fn analyze(&self, request: &ReasoningRequest) -> Result<ReasoningOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let raw_text = match &self.behavior {
            MockBehavior::FromFingerprint => {
                let errors: Vec<Value> = request
                    .fingerprint
                    .issues
                    .iter()
                    .enumerate()
                    .map(|(i, issue)| {
                        json!({
                            "id": format!("mock-{}", i + 1),
                            "type": "structure",
                            "message": issue,
                            "suggestions": [{
                                "text": "Make every record follow the same layout",
                                "safety": "risky"
                            }]
                        })
                    })
                    .collect();
                json!({ "errors": errors, "rag_used": false }).to_string()
            }
            MockBehavior::Fixed(raw) => raw.clone(),
            MockBehavior::RateLimited(retry_after) => {
                return Err(SieveError::RateLimited {
                    retry_after: *retry_after,
                });
            }
            MockBehavior::Fail(message) => return Err(SieveError::Provider(message.clone())),
        };

        Ok(ReasoningOutput {
            tokens_used: Some((raw_text.len() / 4) as u64),
            raw_text,
            model: self.config.model.clone(),
        })
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{fingerprint, FileType, FingerprintConfig};
    use crate::provider::parse_upstream_output;

    fn request(content: &str, file_type: FileType) -> ReasoningRequest {
        ReasoningRequest {
            request_id: "r".into(),
            file_type,
            content: content.into(),
            fingerprint: fingerprint(file_type, content, &FingerprintConfig::default()),
        }
    }

    #[test]
    fn test_mock_reports_fingerprint_issues() {
        let provider = MockProvider::new();
        let output = provider
            .analyze(&request("a,b\n1,2,3\n", FileType::Csv))
            .unwrap();
        let parsed = parse_upstream_output(&output.raw_text).unwrap();
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0]["type"], "structure");
        assert_eq!(output.model, "mock-1");
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn test_mock_failures() {
        let throttled = MockProvider::with_behavior(MockBehavior::RateLimited(Some(3)));
        assert!(matches!(
            throttled.analyze(&request("{}", FileType::Json)),
            Err(SieveError::RateLimited { retry_after: Some(3) })
        ));

        let failing = MockProvider::with_behavior(MockBehavior::Fail("down".into()));
        assert!(matches!(
            failing.analyze(&request("{}", FileType::Json)),
            Err(SieveError::Provider(_))
        ));
        assert_eq!(failing.calls(), 1);
    }

    #[test]
    fn test_fixed_response() {
        let provider = MockProvider::fixed("not json at all");
        let output = provider.analyze(&request("x: 1", FileType::Yaml)).unwrap();
        assert_eq!(output.raw_text, "not json at all");
    }
}
