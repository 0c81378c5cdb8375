//! Reading provider answers back into raw error lists.

use serde_json::Value;

use crate::response::SanityChecks;

/// An interpretable provider answer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedOutput {
    /// Raw, unnormalized error records.
    pub errors: Vec<Value>,
    pub rag_used: Option<bool>,
    pub sanity_checks: Option<SanityChecks>,
}

/// Parse provider text into an error list.
///
/// Accepts a JSON object with an `errors` array or a bare JSON array,
/// optionally wrapped in a markdown code fence or surrounded by prose. On
/// failure returns structural hints describing what was wrong.
pub fn parse_upstream_output(raw: &str) -> Result<ParsedOutput, Vec<String>> {
    if raw.trim().is_empty() {
        return Err(vec!["Response was empty".to_string()]);
    }

    let Some(candidate) = extract_json(raw) else {
        return Err(vec![
            "No JSON object or array found in the response".to_string(),
            "Expected {\"errors\": [...]}".to_string(),
        ]);
    };

    let value: Value = match serde_json::from_str(candidate) {
        Ok(v) => v,
        Err(e) => {
            return Err(vec![
                format!("Response is not valid JSON: {}", e),
                "Expected {\"errors\": [...]}".to_string(),
            ]);
        }
    };

    match value {
        Value::Array(errors) => Ok(ParsedOutput {
            errors,
            ..ParsedOutput::default()
        }),
        Value::Object(map) => {
            let errors = match map.get("errors") {
                Some(Value::Array(items)) => items.clone(),
                Some(other) => {
                    return Err(vec![format!(
                        "'errors' must be an array, found {}",
                        kind_of(other)
                    )]);
                }
                None => {
                    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    keys.truncate(10);
                    return Err(vec![
                        "Expected an 'errors' array at the top level".to_string(),
                        format!("Found keys: [{}]", keys.join(", ")),
                    ]);
                }
            };
            Ok(ParsedOutput {
                errors,
                rag_used: map.get("rag_used").and_then(Value::as_bool),
                sanity_checks: map.get("sanity_checks").and_then(sanity_checks),
            })
        }
        other => Err(vec![format!(
            "Expected a JSON object or array, found {}",
            kind_of(&other)
        )]),
    }
}

/// Pull the JSON payload out of a response, handling markdown code blocks.
fn extract_json(response: &str) -> Option<&str> {
    let fenced = if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
    } else if response.contains("```") {
        response.split("```").nth(1)
    } else {
        None
    };
    let text = fenced.unwrap_or(response).trim();

    if text.starts_with('{') || text.starts_with('[') {
        return Some(text);
    }

    // Prose around the payload: take the outermost bracketed span.
    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

fn sanity_checks(value: &Value) -> Option<SanityChecks> {
    let passed = value.get("passed").and_then(Value::as_u64)?;
    let failed = value.get("failed").and_then(Value::as_u64).unwrap_or(0);
    Some(SanityChecks {
        passed: passed as usize,
        failed: failed as usize,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
