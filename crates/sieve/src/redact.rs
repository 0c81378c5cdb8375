//! Best-effort removal of likely secrets from free text.
//!
//! Applied to anything that is logged or placed in an error `details` field.
//! Structured `errors` lists are never touched. The patterns are heuristics:
//! redaction is lossy, will miss secrets that do not look like the shapes
//! below, and is a second line of defence rather than a guarantee.
//!
//! Patterns run in a fixed order, each over the output of the previous one:
//!
//! 1. alphanumeric runs of 32+ characters (API keys, hex tokens)
//! 2. email addresses
//! 3. URLs carrying `user:password@` credentials
//! 4. three-segment base64url tokens shaped like signed bearer tokens
//!
//! The result is then truncated. Running the redactor on its own output is a
//! no-op.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Replacement text for redacted spans.
pub const REDACTED: &str = "[REDACTED]";

/// Appended when text is cut to length.
pub const TRUNCATION_MARKER: &str = "...[truncated]";

static LONG_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9]{32,}").unwrap());

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static CREDENTIAL_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z][A-Za-z0-9+.-]*://)[^\s:/@]+:[^\s/@]+@").unwrap());

// A header segment already replaced by LONG_TOKEN still anchors the match, so
// the payload and signature segments do not survive.
static BEARER_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\[REDACTED\]|eyJ[A-Za-z0-9_-]*)\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)*")
        .unwrap()
});

/// Length limits applied after pattern redaction.
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    /// Maximum characters for log lines.
    pub log_max_len: usize,
    /// Maximum characters for error `details`.
    pub details_max_len: usize,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            log_max_len: 200,
            details_max_len: 500,
        }
    }
}

/// Redacts and truncates free text.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    config: RedactionConfig,
}

impl Redactor {
    /// Create a redactor with custom limits.
    pub fn with_config(config: RedactionConfig) -> Self {
        Self { config }
    }

    /// The configured limits.
    pub fn config(&self) -> &RedactionConfig {
        &self.config
    }

    /// Redact for a log line.
    pub fn redact_for_log(&self, text: &str) -> String {
        self.redact(text, self.config.log_max_len)
    }

    /// Redact for an error response `details` field.
    pub fn redact_details(&self, text: &str) -> String {
        self.redact(text, self.config.details_max_len)
    }

    /// Apply every pattern, then truncate to `max_len` characters.
    pub fn redact(&self, text: &str, max_len: usize) -> String {
        truncate(&redact_patterns(text), max_len)
    }
}

/// Apply the secret patterns without truncating.
pub fn redact_patterns(text: &str) -> Cow<'_, str> {
    let mut result = Cow::Borrowed(text);

    if LONG_TOKEN.is_match(&result) {
        result = Cow::Owned(LONG_TOKEN.replace_all(&result, REDACTED).into_owned());
    }
    if EMAIL.is_match(&result) {
        result = Cow::Owned(EMAIL.replace_all(&result, REDACTED).into_owned());
    }
    if CREDENTIAL_URL.is_match(&result) {
        result = Cow::Owned(
            CREDENTIAL_URL
                .replace_all(&result, format!("${{1}}{}@", REDACTED).as_str())
                .into_owned(),
        );
    }
    if BEARER_TOKEN.is_match(&result) {
        result = Cow::Owned(BEARER_TOKEN.replace_all(&result, REDACTED).into_owned());
    }

    result
}

/// Cut to at most `max_len` characters, marker included.
fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let marker_len = TRUNCATION_MARKER.chars().count();
    if max_len < marker_len {
        return text.chars().take(max_len).collect();
    }
    let mut out: String = text.chars().take(max_len - marker_len).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}
