//! Administrative cache invalidation.
//!
//! Commands arrive as loosely-typed JSON and are checked strictly before any
//! store mutation happens. Storage itself is delegated to a [`CacheStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::cache::{CacheStore, VersionKind};
use crate::error::{Result, SieveError};
use crate::fingerprint::FileType;

const VALID_SCOPES: &str = "all, file_type, version";

/// A validated invalidation command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationCommand {
    /// Delete every cached result.
    All,
    /// Delete cached results for one file type.
    FileType(FileType),
    /// Record a new model or rag generation.
    Version { kind: VersionKind, version: String },
}

impl InvalidationCommand {
    /// Parse a command body such as `{"scope": "file_type", "file_type": "csv"}`.
    pub fn from_value(body: &Value) -> Result<Self> {
        let scope = match body.get("scope") {
            Some(Value::String(s)) => s.trim(),
            Some(other) => {
                return Err(SieveError::validation(
                    "scope",
                    format!("'{}' is not a valid scope. Must be one of: {}", other, VALID_SCOPES),
                ));
            }
            None => {
                return Err(SieveError::validation(
                    "scope",
                    format!("scope is required. Must be one of: {}", VALID_SCOPES),
                ));
            }
        };

        match scope {
            "all" => Ok(InvalidationCommand::All),
            "file_type" => {
                let file_type = match body.get("file_type").or_else(|| body.get("fileType")) {
                    Some(Value::String(s)) => s.parse::<FileType>().map_err(|_| {
                        SieveError::validation(
                            "file_type",
                            format!(
                                "'{}' is not a supported file type. Must be one of: {}",
                                s,
                                FileType::valid_values()
                            ),
                        )
                    })?,
                    Some(other) => {
                        return Err(SieveError::validation(
                            "file_type",
                            format!(
                                "'{}' is not a supported file type. Must be one of: {}",
                                other,
                                FileType::valid_values()
                            ),
                        ));
                    }
                    None => {
                        return Err(SieveError::validation(
                            "file_type",
                            format!(
                                "file_type is required for scope 'file_type'. Must be one of: {}",
                                FileType::valid_values()
                            ),
                        ));
                    }
                };
                Ok(InvalidationCommand::FileType(file_type))
            }
            "version" => {
                let kind = match body.get("type").and_then(Value::as_str) {
                    Some(s) => s.parse::<VersionKind>()?,
                    None => {
                        return Err(SieveError::validation(
                            "type",
                            "type is required for scope 'version'. Must be one of: model, rag",
                        ));
                    }
                };
                let version = body
                    .get("version")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| {
                        SieveError::validation("version", "version must be a non-empty string")
                    })?;
                Ok(InvalidationCommand::Version {
                    kind,
                    version: version.to_string(),
                })
            }
            other => Err(SieveError::validation(
                "scope",
                format!("'{}' is not a valid scope. Must be one of: {}", other, VALID_SCOPES),
            )),
        }
    }

    pub fn scope(&self) -> &'static str {
        match self {
            InvalidationCommand::All => "all",
            InvalidationCommand::FileType(_) => "file_type",
            InvalidationCommand::Version { .. } => "version",
        }
    }
}

/// Result of a successful invalidation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidationOutcome {
    pub success: bool,
    pub scope: &'static str,
    pub deleted_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_type: Option<VersionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
    pub invalidated_at: DateTime<Utc>,
}

impl InvalidationOutcome {
    fn new(command: &InvalidationCommand, deleted_entries: usize) -> Self {
        Self {
            success: true,
            scope: command.scope(),
            deleted_entries,
            file_type: None,
            version_type: None,
            version: None,
            previous_version: None,
            invalidated_at: Utc::now(),
        }
    }
}

/// Gatekeeper for invalidation commands.
#[derive(Clone)]
pub struct InvalidationController {
    store: Arc<dyn CacheStore>,
    admin_secret: Option<String>,
}

impl InvalidationController {
    /// An empty secret counts as no secret.
    pub fn new(store: Arc<dyn CacheStore>, admin_secret: Option<String>) -> Self {
        Self {
            store,
            admin_secret: admin_secret.filter(|s| !s.is_empty()),
        }
    }

    /// True when commands are accepted without a secret.
    pub fn is_open(&self) -> bool {
        self.admin_secret.is_none()
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Check the caller's secret. Comparison time does not depend on where
    /// the strings differ or on their lengths.
    pub fn authorize(&self, provided: Option<&str>) -> Result<()> {
        let Some(expected) = self.admin_secret.as_deref() else {
            return Ok(());
        };
        let Some(provided) = provided else {
            return Err(SieveError::Unauthorized("Missing admin secret".to_string()));
        };

        let expected = Sha256::digest(expected.as_bytes());
        let provided = Sha256::digest(provided.as_bytes());
        if bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
            Ok(())
        } else {
            Err(SieveError::Unauthorized("Invalid admin secret".to_string()))
        }
    }

    /// Apply a validated command to the store.
    pub fn execute(&self, command: &InvalidationCommand) -> Result<InvalidationOutcome> {
        let outcome = match command {
            InvalidationCommand::All => {
                let deleted = self.store.clear_all()?;
                InvalidationOutcome::new(command, deleted)
            }
            InvalidationCommand::FileType(file_type) => {
                let deleted = self.store.clear_file_type(*file_type)?;
                InvalidationOutcome {
                    file_type: Some(*file_type),
                    ..InvalidationOutcome::new(command, deleted)
                }
            }
            InvalidationCommand::Version { kind, version } => {
                let previous = self.store.set_version(*kind, version)?;
                InvalidationOutcome {
                    version_type: Some(*kind),
                    version: Some(version.clone()),
                    previous_version: Some(previous),
                    ..InvalidationOutcome::new(command, 0)
                }
            }
        };

        tracing::info!(
            scope = outcome.scope,
            deleted_entries = outcome.deleted_entries,
            store = self.store.name(),
            "Cache invalidated"
        );
        Ok(outcome)
    }

    /// Authorize, parse and execute a raw command body.
    pub fn handle(&self, provided_secret: Option<&str>, body: &Value) -> Result<InvalidationOutcome> {
        if let Err(e) = self.authorize(provided_secret) {
            tracing::warn!("Rejected invalidation command: {}", e);
            return Err(e);
        }
        let command = InvalidationCommand::from_value(body)?;
        self.execute(&command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use serde_json::json;

    fn controller(secret: Option<&str>) -> InvalidationController {
        InvalidationController::new(Arc::new(MemoryCacheStore::new()), secret.map(String::from))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            InvalidationCommand::from_value(&json!({"scope": "all"})).unwrap(),
            InvalidationCommand::All
        );
        assert_eq!(
            InvalidationCommand::from_value(&json!({"scope": "file_type", "file_type": "CSV"})).unwrap(),
            InvalidationCommand::FileType(FileType::Csv)
        );
        assert_eq!(
            InvalidationCommand::from_value(&json!({"scope": "version", "type": "rag", "version": "r7"}))
                .unwrap(),
            InvalidationCommand::Version {
                kind: VersionKind::Rag,
                version: "r7".into()
            }
        );
    }

    #[test]
    fn test_invalid_commands_name_the_problem() {
        let err = InvalidationCommand::from_value(&json!({"scope": "file_type", "file_type": "ini"}))
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("'ini'"));
        assert!(text.contains("json, csv, xml, yaml"));

        let err = InvalidationCommand::from_value(&json!({"scope": "file_type"})).unwrap_err();
        assert!(matches!(err, SieveError::Validation { ref field, .. } if field == "file_type"));

        let err = InvalidationCommand::from_value(&json!({"scope": "everything"})).unwrap_err();
        assert!(err.to_string().contains("'everything'"));

        assert!(InvalidationCommand::from_value(&json!({})).is_err());
        assert!(InvalidationCommand::from_value(&json!({"scope": "version", "type": "model"})).is_err());
        assert!(
            InvalidationCommand::from_value(&json!({"scope": "version", "type": "model", "version": "  "}))
                .is_err()
        );
        assert!(
            InvalidationCommand::from_value(&json!({"scope": "version", "type": "prompt", "version": "2"}))
                .is_err()
        );
    }

    #[test]
    fn test_authorize() {
        let open = controller(None);
        assert!(open.is_open());
        assert!(open.authorize(None).is_ok());

        assert!(controller(Some("")).is_open());

        let gated = controller(Some("s3cret"));
        assert!(!gated.is_open());
        assert!(gated.authorize(Some("s3cret")).is_ok());
        assert!(matches!(gated.authorize(Some("s3cre")), Err(SieveError::Unauthorized(_))));
        assert!(matches!(gated.authorize(None), Err(SieveError::Unauthorized(_))));
    }

    #[test]
    fn test_handle_outcome_shape() {
        let controller = controller(Some("k"));
        let outcome = controller
            .handle(Some("k"), &json!({"scope": "file_type", "file_type": "csv"}))
            .unwrap();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["scope"], "file_type");
        assert_eq!(value["file_type"], "csv");
        assert_eq!(value["deleted_entries"], 0);
        assert!(value.get("version").is_none());
        assert!(value["invalidated_at"].is_string());

        let outcome = controller
            .handle(Some("k"), &json!({"scope": "version", "type": "model", "version": "m2"}))
            .unwrap();
        assert_eq!(outcome.previous_version.as_deref(), Some("initial"));
        assert_eq!(outcome.version_type, Some(VersionKind::Model));
        assert_eq!(controller.store().current_version(VersionKind::Model).unwrap(), "m2");

        assert!(controller.handle(Some("wrong"), &json!({"scope": "all"})).is_err());
    }
}
