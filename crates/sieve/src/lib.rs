//! Sieve: data-quality inspection for semi-structured files.
//!
//! Sieve accepts JSON, CSV, XML and YAML content, derives a cheap structural
//! fingerprint, asks a reasoning provider to find errors, and turns whatever
//! comes back into one stable response contract.
//!
//! # Core Principles
//!
//! - **Never fail visibly on input**: fingerprint faults become `issues`
//! - **Deterministic classification**: every error gets a type and severity
//! - **Redact before emit**: free text is scrubbed before logs and responses
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sieve::{AnalyzeRequest, FileType, Inspector, MemoryCacheStore, MockProvider};
//!
//! let inspector = Inspector::new(Arc::new(MockProvider::new()))
//!     .with_cache(Arc::new(MemoryCacheStore::new()));
//!
//! let response = inspector.inspect(AnalyzeRequest::new("id,name\n1,alpha\n2\n", FileType::Csv));
//! println!("{}", serde_json::to_string_pretty(&response).unwrap());
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod invalidation;
pub mod normalize;
pub mod provider;
pub mod redact;
pub mod request;
pub mod response;

mod inspector;

pub use crate::inspector::Inspector;
pub use cache::{CacheKey, CacheStore, MemoryCacheStore, VersionKind, DEFAULT_MAX_ENTRIES};
pub use config::SieveConfig;
pub use error::{Result, SieveError};
pub use fingerprint::{
    fingerprint, fingerprint_file, fingerprint_value, FileType, FingerprintConfig, InferredType,
    SchemaFingerprint,
};
pub use invalidation::{InvalidationCommand, InvalidationController, InvalidationOutcome};
pub use normalize::{normalize_errors, ErrorType, NormalizedError, Severity, SuggestionSafety};
pub use provider::{AnthropicProvider, MockProvider, ReasoningProvider};
pub use redact::Redactor;
pub use request::AnalyzeRequest;
pub use response::{Environment, ErrorKind, NormalizedResponse, ResponseBuilder};
