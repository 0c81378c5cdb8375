//! Reasoning provider seam.
//!
//! The provider performs the actual error detection; this crate only builds
//! the request, calls the provider, and reads its answer back. Everything a
//! provider returns is treated as untrusted text until
//! [`parse_upstream_output`] accepts it.
//!
//! # Supported Providers
//!
//! - **Anthropic** - Claude models via the messages API (requires `ANTHROPIC_API_KEY`)
//! - **Mock** - deterministic, offline; used by tests and `--provider mock`

mod anthropic;
mod mock;
mod output;
mod prompts;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fingerprint::{FileType, SchemaFingerprint};

pub use anthropic::AnthropicProvider;
pub use mock::{MockBehavior, MockProvider};
pub use output::{parse_upstream_output, ParsedOutput};
pub use prompts::{analysis_prompt, system_prompt};

/// What the provider is asked to inspect.
#[derive(Debug, Clone)]
pub struct ReasoningRequest {
    pub request_id: String,
    pub file_type: FileType,
    pub content: String,
    pub fingerprint: SchemaFingerprint,
}

/// Raw provider answer plus accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningOutput {
    pub raw_text: String,
    pub tokens_used: Option<u64>,
    pub model: String,
}

/// Configuration for reasoning providers.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 2048,
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

impl ProviderConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Trait for reasoning providers.
///
/// Implementations must be thread-safe (Send + Sync) so one instance can
/// serve concurrent requests. Calls block; async callers should run them on
/// a blocking pool.
pub trait ReasoningProvider: Send + Sync {
    /// Ask the provider to find errors in the request content.
    fn analyze(&self, request: &ReasoningRequest) -> Result<ReasoningOutput>;

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;

    /// Get the name of this provider (for logging and provenance).
    fn name(&self) -> &str;
}
