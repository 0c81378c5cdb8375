//! Core type definitions for structural fingerprints.

use std::fmt;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::SieveError;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Json,
    Csv,
    Xml,
    Yaml,
}

impl FileType {
    /// All supported file types, in display order.
    pub const ALL: [FileType; 4] = [FileType::Json, FileType::Csv, FileType::Xml, FileType::Yaml];

    /// Lowercase tag used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Json => "json",
            FileType::Csv => "csv",
            FileType::Xml => "xml",
            FileType::Yaml => "yaml",
        }
    }

    /// Comma-separated list of valid tags, for error messages.
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Map a file extension (without the dot) to a file type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" | "jsonl" => Some(FileType::Json),
            "csv" => Some(FileType::Csv),
            "xml" => Some(FileType::Xml),
            "yaml" | "yml" => Some(FileType::Yaml),
            _ => None,
        }
    }

    /// Guess the file type from the first non-blank character of the content.
    ///
    /// Used only when neither a declared type nor an extension is available.
    pub fn detect(content: &str) -> Self {
        let trimmed = content.trim_start();
        match trimmed.chars().next() {
            Some('{') | Some('[') => FileType::Json,
            Some('<') => FileType::Xml,
            _ => {
                let first_line = trimmed.lines().next().unwrap_or_default();
                if first_line.starts_with("---") || first_line.trim_end().ends_with(':') {
                    FileType::Yaml
                } else if first_line.contains(',') {
                    FileType::Csv
                } else {
                    FileType::Yaml
                }
            }
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(FileType::Json),
            "csv" => Ok(FileType::Csv),
            "xml" => Ok(FileType::Xml),
            "yaml" | "yml" => Ok(FileType::Yaml),
            _ => Err(SieveError::UnsupportedFileType(s.to_string())),
        }
    }
}

/// Primitive-or-container type observed for a field in the sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferredType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Empty,
}

impl InferredType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferredType::String => "string",
            InferredType::Number => "number",
            InferredType::Boolean => "boolean",
            InferredType::Object => "object",
            InferredType::Array => "array",
            InferredType::Empty => "empty",
        }
    }

    /// Classify a parsed JSON value.
    pub fn of_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => InferredType::Empty,
            Value::Bool(_) => InferredType::Boolean,
            Value::Number(_) => InferredType::Number,
            Value::String(_) => InferredType::String,
            Value::Array(_) => InferredType::Array,
            Value::Object(_) => InferredType::Object,
        }
    }

    /// Classify a raw text cell (CSV cells, YAML scalars).
    pub fn of_text(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() {
            InferredType::Empty
        } else if is_numeric(cell) {
            InferredType::Number
        } else if cell.eq_ignore_ascii_case("true") || cell.eq_ignore_ascii_case("false") {
            InferredType::Boolean
        } else {
            InferredType::String
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric-coercible text. `inf`/`NaN` spellings parse as `f64` but are not
/// numbers for inference purposes.
fn is_numeric(s: &str) -> bool {
    s.parse::<f64>().map(|v| v.is_finite()).unwrap_or(false)
}

/// Compact structural summary of a semi-structured document.
///
/// Advisory context only: it is attached to reasoning requests and used as
/// cache-key material, never as a correctness gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFingerprint {
    pub file_type: FileType,

    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub top_level_keys: IndexSet<String>,

    /// Order-significant: position defines the column index.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column_headers: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub tag_names: IndexSet<String>,

    pub record_count: usize,

    #[serde(default)]
    pub data_types: IndexMap<String, IndexSet<InferredType>>,

    #[serde(default)]
    pub issues: Vec<String>,
}

impl SchemaFingerprint {
    /// An empty fingerprint for the given format.
    pub fn empty(file_type: FileType) -> Self {
        Self {
            file_type,
            top_level_keys: IndexSet::new(),
            column_headers: Vec::new(),
            tag_names: IndexSet::new(),
            record_count: 0,
            data_types: IndexMap::new(),
            issues: Vec::new(),
        }
    }

    /// Record a type observation for a field, ignoring duplicates.
    pub(crate) fn observe(&mut self, field: &str, ty: InferredType) {
        self.data_types
            .entry(field.to_string())
            .or_default()
            .insert(ty);
    }

    /// Types seen for a field, if any.
    pub fn types_of(&self, field: &str) -> Option<&IndexSet<InferredType>> {
        self.data_types.get(field)
    }

    /// True if the field was seen with more than one type.
    pub fn is_heterogeneous(&self, field: &str) -> bool {
        self.types_of(field).is_some_and(|t| t.len() > 1)
    }

    /// Stable SHA-256 digest of the structural content.
    ///
    /// Sets are sorted before hashing so that observation order does not
    /// change the digest.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.file_type.as_str());

        let mut keys: Vec<&String> = self.top_level_keys.iter().collect();
        keys.sort();
        for key in keys {
            hasher.update(b"\x1fk");
            hasher.update(key.as_bytes());
        }
        for header in &self.column_headers {
            hasher.update(b"\x1fh");
            hasher.update(header.as_bytes());
        }
        let mut tags: Vec<&String> = self.tag_names.iter().collect();
        tags.sort();
        for tag in tags {
            hasher.update(b"\x1ft");
            hasher.update(tag.as_bytes());
        }
        let mut fields: Vec<(&String, Vec<InferredType>)> = self
            .data_types
            .iter()
            .map(|(k, v)| {
                let mut types: Vec<InferredType> = v.iter().copied().collect();
                types.sort();
                (k, types)
            })
            .collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (field, types) in fields {
            hasher.update(b"\x1fd");
            hasher.update(field.as_bytes());
            for ty in types {
                hasher.update([ty as u8]);
            }
        }
        hasher.update(self.record_count.to_le_bytes());

        format!("{:x}", hasher.finalize())
    }
}

/// Fingerprint configuration.
#[derive(Debug, Clone)]
pub struct FingerprintConfig {
    /// Number of records inspected for type inference.
    pub sample_size: usize,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self { sample_size: 10 }
    }
}

impl FingerprintConfig {
    /// Config with a specific sample size.
    pub fn with_sample_size(sample_size: usize) -> Self {
        Self { sample_size }
    }
}
