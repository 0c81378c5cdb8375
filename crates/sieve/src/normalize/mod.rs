//! Error normalization and taxonomy.

mod normalizer;
mod taxonomy;

pub use normalizer::{normalize_errors, NormalizedError, NormalizerConfig, Suggestion};
pub use taxonomy::{ErrorType, Severity, SuggestionSafety};
