//! Invalidate command - send a cache invalidation command to a running server.

use colored::Colorize;
use serde_json::{json, Map, Value};

/// Request timeout for the admin call.
const TIMEOUT_SECS: u64 = 30;

pub fn run(
    server: String,
    scope: String,
    file_type: Option<String>,
    version_type: Option<String>,
    label: Option<String>,
    admin_secret: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = command_body(&scope, file_type, version_type, label);
    let url = format!("{}/api/admin/invalidate", server.trim_end_matches('/'));

    if verbose {
        println!("POST {} {}", url, body);
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(TIMEOUT_SECS))
        .build()?;
    let mut request = client.post(&url).json(&body);
    if let Some(secret) = admin_secret.as_deref() {
        request = request.header("x-admin-secret", secret);
    }

    let response = request.send()?;
    let status = response.status();
    let payload: Value = response.json()?;

    if !status.is_success() {
        let message = payload["message"].as_str().unwrap_or("request failed");
        return Err(format!("{} ({})", message, status).into());
    }

    println!(
        "{} scope {}, {} entries deleted",
        "Invalidated".green().bold(),
        payload["scope"].as_str().unwrap_or(&scope).white().bold(),
        payload["deleted_entries"].as_u64().unwrap_or(0).to_string().white()
    );
    if let (Some(kind), Some(version)) = (payload["version_type"].as_str(), payload["version"].as_str()) {
        println!(
            "  {} generation: {} -> {}",
            kind,
            payload["previous_version"].as_str().unwrap_or("-"),
            version.cyan()
        );
    }

    Ok(())
}

/// Build the wire body; validation is left to the server.
fn command_body(
    scope: &str,
    file_type: Option<String>,
    version_type: Option<String>,
    label: Option<String>,
) -> Value {
    let mut body = Map::new();
    body.insert("scope".into(), json!(scope));
    if let Some(file_type) = file_type {
        body.insert("file_type".into(), json!(file_type));
    }
    if let Some(kind) = version_type {
        body.insert("type".into(), json!(kind));
    }
    if let Some(label) = label {
        body.insert("version".into(), json!(label));
    }
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_body_version() {
        let body = command_body("version", None, Some("rag".into()), Some("r7".into()));
        assert_eq!(body, json!({ "scope": "version", "type": "rag", "version": "r7" }));
    }

    #[test]
    fn test_command_body_file_type() {
        let body = command_body("file_type", Some("csv".into()), None, None);
        assert_eq!(body, json!({ "scope": "file_type", "file_type": "csv" }));
    }
}
