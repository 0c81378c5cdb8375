//! Error taxonomy: type classification and severity inference.

use serde::{Deserialize, Serialize};

/// Category of a detected problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Syntax,
    Structure,
    Semantic,
    Validation,
    Warning,
}

impl ErrorType {
    /// Classification order. First keyword found in the category text wins,
    /// so "validation warning" is a validation error.
    const PRIORITY: [ErrorType; 5] = [
        ErrorType::Syntax,
        ErrorType::Structure,
        ErrorType::Semantic,
        ErrorType::Validation,
        ErrorType::Warning,
    ];

    /// Keyword matched against category text.
    pub fn keyword(&self) -> &'static str {
        match self {
            ErrorType::Syntax => "syntax",
            ErrorType::Structure => "structure",
            ErrorType::Semantic => "semantic",
            ErrorType::Validation => "validation",
            ErrorType::Warning => "warning",
        }
    }

    /// Classify free category text, falling back to `default`.
    pub fn classify(category: Option<&str>, default: ErrorType) -> ErrorType {
        let Some(category) = category else {
            return default;
        };
        let category = category.to_lowercase();
        Self::PRIORITY
            .into_iter()
            .find(|t| category.contains(t.keyword()))
            .unwrap_or(default)
    }
}

/// How urgent a problem is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Parse an explicit severity value. Unknown values yield `None` so the
    /// caller falls back to inference.
    pub fn parse(value: &str) -> Option<Severity> {
        match value.trim().to_lowercase().as_str() {
            "critical" | "fatal" => Some(Severity::Critical),
            "high" | "error" => Some(Severity::High),
            "medium" | "moderate" => Some(Severity::Medium),
            "low" | "warning" | "warn" | "info" => Some(Severity::Low),
            _ => None,
        }
    }

    /// Infer severity from message text.
    ///
    /// Tiers are checked in order: critical/fatal, warning, syntax/invalid,
    /// then medium. A record already classified as a warning or syntax error
    /// satisfies the matching tier even when its message lacks the keyword.
    ///
    /// Records without a category resolve to the configured default type,
    /// `syntax`, before this runs. That fallback is what puts a bare
    /// "Unexpected token at line 4" in the high tier; the same message under
    /// a `structure` category is medium.
    pub fn infer(message: &str, error_type: ErrorType) -> Severity {
        let message = message.to_lowercase();
        if message.contains("critical") || message.contains("fatal") {
            Severity::Critical
        } else if message.contains("warning") || error_type == ErrorType::Warning {
            Severity::Low
        } else if message.contains("syntax")
            || message.contains("invalid")
            || error_type == ErrorType::Syntax
        {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

/// Risk of applying a suggested fix automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSafety {
    #[default]
    Safe,
    Risky,
    Dangerous,
}

impl SuggestionSafety {
    /// Parse a safety label; anything unrecognised is `Safe`.
    pub fn parse(value: &str) -> SuggestionSafety {
        match value.trim().to_lowercase().as_str() {
            "risky" => SuggestionSafety::Risky,
            "dangerous" | "unsafe" => SuggestionSafety::Dangerous,
            _ => SuggestionSafety::Safe,
        }
    }
}
