//! Converts loosely-typed upstream error records into [`NormalizedError`]s.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::taxonomy::{ErrorType, Severity, SuggestionSafety};

static LINE_IN_MESSAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bline\s*:?\s*(\d+)").unwrap());

static COLUMN_IN_MESSAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:column|col)\s*:?\s*(\d+)").unwrap());

const MESSAGE_FIELDS: &[&str] = &["message", "description", "error", "detail"];
const CATEGORY_FIELDS: &[&str] = &["type", "category", "kind"];
const SUGGESTION_TEXT_FIELDS: &[&str] = &["text", "suggestion", "fix", "description"];

/// A proposed fix attached to an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub safety: SuggestionSafety,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Suggestion {
    /// A safe suggestion with no confidence score.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            safety: SuggestionSafety::Safe,
            confidence: None,
        }
    }
}

/// One problem in canonical form. `type` and `severity` are always set;
/// locators are `null` when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedError {
    pub id: String,
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    pub message: String,
    pub line: Option<u64>,
    pub column: Option<u64>,
    pub position: Option<u64>,
    pub severity: Severity,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

impl NormalizedError {
    /// True for entries counted as warnings rather than errors.
    pub fn is_warning(&self) -> bool {
        self.error_type == ErrorType::Warning
    }
}

/// Normalizer configuration.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Type assigned when the category text matches no keyword.
    pub default_type: ErrorType,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            default_type: ErrorType::Syntax,
        }
    }
}

/// Normalize a raw upstream error list, preserving order.
///
/// Entries that are not objects are read as `{"message": <entry>}`.
pub fn normalize_errors(raw: &[Value], config: &NormalizerConfig) -> Vec<NormalizedError> {
    raw.iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(map) => normalize_one(index, map, config),
            other => {
                let mut map = Map::new();
                map.insert("message".to_string(), Value::String(scalar_text(other)));
                normalize_one(index, &map, config)
            }
        })
        .collect()
}

fn normalize_one(index: usize, raw: &Map<String, Value>, config: &NormalizerConfig) -> NormalizedError {
    let message = first_text(raw, MESSAGE_FIELDS).unwrap_or_else(|| "Unknown error".to_string());
    let category = first_text(raw, CATEGORY_FIELDS);
    let error_type = ErrorType::classify(category.as_deref(), config.default_type);

    let severity = raw
        .get("severity")
        .and_then(Value::as_str)
        .and_then(Severity::parse)
        .unwrap_or_else(|| Severity::infer(&message, error_type));

    let line = locator(raw, "line").or_else(|| capture_number(&LINE_IN_MESSAGE, &message));
    let column = locator(raw, "column").or_else(|| capture_number(&COLUMN_IN_MESSAGE, &message));

    NormalizedError {
        id: raw
            .get("id")
            .and_then(id_text)
            .unwrap_or_else(|| format!("err-{}", index + 1)),
        error_type,
        line,
        column,
        position: locator(raw, "position"),
        severity,
        suggestions: suggestions(raw),
        message,
    }
}

fn first_text(raw: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|f| raw.get(*f))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        })
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Non-negative integer locator; numeric strings are accepted.
fn locator(raw: &Map<String, Value>, field: &str) -> Option<u64> {
    match raw.get(field)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn capture_number(pattern: &Regex, text: &str) -> Option<u64> {
    pattern.captures(text)?.get(1)?.as_str().parse().ok()
}

fn suggestions(raw: &Map<String, Value>) -> Vec<Suggestion> {
    match raw.get("suggestions") {
        Some(Value::Array(items)) => items.iter().filter_map(suggestion).collect(),
        Some(single) => suggestion(single).into_iter().collect(),
        None => raw
            .get("suggestion")
            .or_else(|| raw.get("fix"))
            .and_then(suggestion)
            .into_iter()
            .collect(),
    }
}

fn suggestion(value: &Value) -> Option<Suggestion> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(Suggestion::new(s.clone())),
        Value::Object(map) => {
            let text = first_text(map, SUGGESTION_TEXT_FIELDS)?;
            Some(Suggestion {
                text,
                safety: map
                    .get("safety")
                    .and_then(Value::as_str)
                    .map(SuggestionSafety::parse)
                    .unwrap_or_default(),
                confidence: map
                    .get("confidence")
                    .and_then(Value::as_f64)
                    .map(|c| c.clamp(0.0, 1.0)),
            })
        }
        _ => None,
    }
}
