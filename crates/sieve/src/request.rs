//! Inbound analyze requests: validation, size capping, and identity.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, SieveError};
use crate::fingerprint::FileType;

/// Longest caller-supplied request id, in characters. Longer ids are
/// rejected rather than shortened.
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// Request validation limits.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Content beyond this many bytes is cut off and the response marked
    /// `truncated`.
    pub max_content_bytes: usize,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_content_bytes: 200_000,
        }
    }
}

/// An analyze request as received from a caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, alias = "fileType")]
    pub file_type: Option<String>,
    #[serde(default, alias = "requestId")]
    pub request_id: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(content: impl Into<String>, file_type: FileType) -> Self {
        Self {
            content: Some(content.into()),
            file_type: Some(file_type.as_str().to_string()),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// The id this request will be answered under: the caller's id exactly
    /// as sent when it is acceptable, otherwise a fresh one.
    pub fn resolve_request_id(&self) -> String {
        self.request_id
            .as_deref()
            .filter(|id| is_acceptable_request_id(id))
            .map(str::to_string)
            .unwrap_or_else(generate_request_id)
    }

    /// Check required fields and apply the size cap.
    pub fn validate(self, request_id: String, config: &RequestConfig) -> Result<ValidatedRequest> {
        if let Some(id) = self.request_id.as_deref() {
            let len = id.chars().count();
            if len > MAX_REQUEST_ID_LEN {
                return Err(SieveError::validation(
                    "request_id",
                    format!(
                        "request_id is {} characters long; at most {} are allowed",
                        len, MAX_REQUEST_ID_LEN
                    ),
                ));
            }
        }

        let file_type: FileType = match self.file_type.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(SieveError::validation(
                    "file_type",
                    format!("file_type is required. Must be one of: {}", FileType::valid_values()),
                ));
            }
            Some(value) => value.parse()?,
        };

        let mut content = self
            .content
            .ok_or_else(|| SieveError::validation("content", "content is required"))?;
        if content.trim().is_empty() {
            return Err(SieveError::validation("content", "content must not be empty"));
        }

        let original_bytes = content.len();
        let truncated = truncate_at_char_boundary(&mut content, config.max_content_bytes);
        if truncated {
            tracing::debug!(
                request_id = %request_id,
                original_bytes,
                kept_bytes = content.len(),
                "Content truncated to size cap"
            );
        }

        Ok(ValidatedRequest {
            content_hash: content_hash(&content),
            request_id,
            file_type,
            content,
            truncated,
            original_bytes,
        })
    }
}

/// A request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub request_id: String,
    pub file_type: FileType,
    /// Content after the size cap.
    pub content: String,
    pub truncated: bool,
    /// Size before the cap was applied.
    pub original_bytes: usize,
    /// `sha256:<hex>` of `content`.
    pub content_hash: String,
}

/// `sha256:<hex>` digest of the given content.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}

/// Caller ids are opaque: any non-blank id within the length cap is echoed
/// back unchanged.
pub fn is_acceptable_request_id(id: &str) -> bool {
    !id.trim().is_empty() && id.chars().count() <= MAX_REQUEST_ID_LEN
}

/// New request id: `req_<unix millis>_<random hex>`.
pub fn generate_request_id() -> String {
    format!("req_{}_{:08x}", Utc::now().timestamp_millis(), fastrand::u32(..))
}

fn truncate_at_char_boundary(content: &mut String, max_bytes: usize) -> bool {
    if content.len() <= max_bytes {
        return false;
    }
    let mut end = max_bytes;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    content.truncate(end);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ok() {
        let request = AnalyzeRequest::new("{\"a\": 1}", FileType::Json);
        let validated = request.validate("r1".into(), &RequestConfig::default()).unwrap();
        assert_eq!(validated.file_type, FileType::Json);
        assert!(!validated.truncated);
        assert!(validated.content_hash.starts_with("sha256:"));
        assert_eq!(validated.content_hash.len(), "sha256:".len() + 64);
    }

    #[test]
    fn test_missing_and_empty_content() {
        let request = AnalyzeRequest {
            file_type: Some("csv".into()),
            ..Default::default()
        };
        let err = request.validate("r".into(), &RequestConfig::default()).unwrap_err();
        assert!(matches!(err, SieveError::Validation { ref field, .. } if field == "content"));

        let request = AnalyzeRequest::new("   \n", FileType::Csv);
        assert!(request.validate("r".into(), &RequestConfig::default()).is_err());
    }

    #[test]
    fn test_bad_file_type() {
        let request = AnalyzeRequest {
            content: Some("a=1".into()),
            file_type: Some("ini".into()),
            request_id: None,
        };
        let err = request.validate("r".into(), &RequestConfig::default()).unwrap_err();
        assert!(matches!(err, SieveError::UnsupportedFileType(ref v) if v.contains("ini")));

        let request = AnalyzeRequest {
            content: Some("a=1".into()),
            ..Default::default()
        };
        let err = request.validate("r".into(), &RequestConfig::default()).unwrap_err();
        assert!(err.to_string().contains("json, csv, xml, yaml"));
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        let config = RequestConfig { max_content_bytes: 5 };
        // 'é' is two bytes; a cut at byte 5 would split the third one.
        let request = AnalyzeRequest::new("éééé", FileType::Yaml);
        let validated = request.validate("r".into(), &config).unwrap();
        assert!(validated.truncated);
        assert_eq!(validated.content, "éé");
        assert_eq!(validated.original_bytes, 8);
    }

    #[test]
    fn test_request_id_echoed_verbatim() {
        for id in ["client-7", "order#42/retry 1", "  padded ", "ünïcode<>"] {
            let request = AnalyzeRequest::new("x", FileType::Csv).with_request_id(id);
            assert_eq!(request.resolve_request_id(), id);
            let validated = request
                .validate(id.to_string(), &RequestConfig::default())
                .unwrap();
            assert_eq!(validated.request_id, id);
        }

        assert!(AnalyzeRequest::default().resolve_request_id().starts_with("req_"));
        let blank = AnalyzeRequest::new("x", FileType::Csv).with_request_id("   ");
        assert!(blank.resolve_request_id().starts_with("req_"));
    }

    #[test]
    fn test_overlong_request_id_rejected() {
        let id = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        let request = AnalyzeRequest::new("x", FileType::Csv).with_request_id(id.clone());
        let resolved = request.resolve_request_id();
        assert_ne!(resolved, id);

        let err = request.validate(resolved, &RequestConfig::default()).unwrap_err();
        assert!(matches!(err, SieveError::Validation { ref field, .. } if field == "request_id"));

        let at_cap = "y".repeat(MAX_REQUEST_ID_LEN);
        assert!(is_acceptable_request_id(&at_cap));
    }

    #[test]
    fn test_deserialize_camel_case_aliases() {
        let request: AnalyzeRequest =
            serde_json::from_str(r#"{"content": "a,b", "fileType": "csv", "requestId": "x1"}"#).unwrap();
        assert_eq!(request.file_type.as_deref(), Some("csv"));
        assert_eq!(request.request_id.as_deref(), Some("x1"));
    }
}
