//! Anthropic Claude API provider implementation.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, SieveError};
use crate::redact::Redactor;

use super::prompts;
use super::{ProviderConfig, ReasoningOutput, ReasoningProvider, ReasoningRequest};

/// Anthropic API endpoint.
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version.
const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude provider.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    config: ProviderConfig,
    api_url: String,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ProviderConfig::default())
    }

    /// Create a new Anthropic provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SieveError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
            api_url: API_URL.to_string(),
        })
    }

    /// Create from environment variable.
    pub fn from_env(config: ProviderConfig) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            SieveError::Config("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Self::with_config(api_key, config)
    }

    /// Point the provider at a different endpoint (proxies, test servers).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|_| SieveError::Config("Invalid API key".to_string()))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    /// Send a message to the Claude API.
    fn send_message(&self, user_prompt: &str) -> Result<ApiResponse> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": prompts::system_prompt(),
            "messages": [
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        let response = self
            .client
            .post(&self.api_url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    SieveError::ProviderTimeout(self.config.timeout_secs)
                } else {
                    SieveError::Provider(format!("API request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SieveError::RateLimited {
                retry_after: retry_after_secs(&response),
            });
        }
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(SieveError::Provider(format!(
                "API error ({}): {}",
                status,
                Redactor::default().redact_details(&error_text)
            )));
        }

        response
            .json()
            .map_err(|e| SieveError::Provider(format!("Failed to parse API response: {}", e)))
    }
}

impl ReasoningProvider for AnthropicProvider {
    fn analyze(&self, request: &ReasoningRequest) -> Result<ReasoningOutput> {
        let prompt = prompts::analysis_prompt(request);
        tracing::debug!(
            request_id = %request.request_id,
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "Calling Anthropic"
        );

        let api_response = self.send_message(&prompt)?;
        let tokens_used = api_response
            .usage
            .map(|u| u.input_tokens + u.output_tokens);
        let model = api_response.model.unwrap_or_else(|| self.config.model.clone());

        // Extract text from response
        let raw_text = api_response
            .content
            .into_iter()
            .filter(|block| block.content_type == "text")
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(ReasoningOutput {
            raw_text,
            tokens_used,
            model,
        })
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// `retry-after` in whole seconds, when the header is a plain integer.
fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Anthropic API response structure.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

/// Content block in API response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}
