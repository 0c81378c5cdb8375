//! Schema fingerprint engine.
//!
//! One scanner per format, each a pure function over the content and a
//! sample bound. Fingerprints are advisory, so every entry point here returns
//! a plain [`SchemaFingerprint`]: a scanner fault becomes a single `issues`
//! entry instead of an error.

mod csv;
mod json;
mod types;
mod xml;
mod yaml;

use std::fs;
use std::path::Path;

pub use json::fingerprint_json;
pub use types::{FileType, FingerprintConfig, InferredType, SchemaFingerprint};

use crate::error::{Result, SieveError};
use crate::redact::Redactor;

/// Fingerprint raw text of a declared format.
pub fn fingerprint(file_type: FileType, content: &str, config: &FingerprintConfig) -> SchemaFingerprint {
    let result = match file_type {
        FileType::Json => json::fingerprint_json_text(content, config),
        FileType::Csv => csv::fingerprint_csv_text(content, config),
        FileType::Xml => xml::fingerprint_xml_text(content),
        FileType::Yaml => yaml::fingerprint_yaml_text(content, config),
    };
    absorb(file_type, result)
}

/// Fingerprint an already-parsed JSON document.
pub fn fingerprint_value(value: &serde_json::Value, config: &FingerprintConfig) -> SchemaFingerprint {
    fingerprint_json(value, config)
}

/// Read a file and fingerprint it, taking the format from its extension or,
/// failing that, from its content.
///
/// Only reading the file can fail; the scan itself never does.
pub fn fingerprint_file(path: impl AsRef<Path>, config: &FingerprintConfig) -> Result<SchemaFingerprint> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| SieveError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let file_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(FileType::from_extension)
        .unwrap_or_else(|| FileType::detect(&content));

    Ok(fingerprint(file_type, &content, config))
}

/// Convert a scanner result into a fingerprint, folding any fault into
/// `issues`.
fn absorb(file_type: FileType, result: Result<SchemaFingerprint>) -> SchemaFingerprint {
    match result {
        Ok(fp) => fp,
        Err(e) => {
            tracing::debug!(
                file_type = %file_type,
                error = %Redactor::default().redact_for_log(&e.to_string()),
                "fingerprint scan failed"
            );
            let mut fp = SchemaFingerprint::empty(file_type);
            fp.issues.push(format!("Failed to analyze {} schema", file_type));
            fp
        }
    }
}
