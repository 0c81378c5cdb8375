//! Result cache seam.
//!
//! The production store lives outside this crate; [`CacheStore`] is the
//! contract it implements. [`MemoryCacheStore`] is an in-process store used
//! by the CLI server and tests.
//!
//! Entries are stamped with the model and retrieval ("rag") generations that
//! were current when they were written. Bumping a generation makes older
//! entries misses without deleting them.

mod memory;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};
use crate::fingerprint::{FileType, SchemaFingerprint};
use crate::response::SuccessResponse;

pub use memory::{MemoryCacheStore, DEFAULT_MAX_ENTRIES};

/// Generation counters that invalidate cached results when bumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionKind {
    Model,
    Rag,
}

impl VersionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionKind::Model => "model",
            VersionKind::Rag => "rag",
        }
    }
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionKind {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "model" => Ok(VersionKind::Model),
            "rag" => Ok(VersionKind::Rag),
            other => Err(SieveError::validation(
                "type",
                format!("'{}' is not a version type. Must be one of: model, rag", other),
            )),
        }
    }
}

/// Identity of a cached analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub file_type: FileType,
    pub content_hash: String,
    pub fingerprint_digest: String,
}

impl CacheKey {
    pub fn new(file_type: FileType, content_hash: impl Into<String>, fingerprint: &SchemaFingerprint) -> Self {
        Self {
            file_type,
            content_hash: content_hash.into(),
            fingerprint_digest: fingerprint.digest(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file_type,
            self.content_hash,
            &self.fingerprint_digest[..self.fingerprint_digest.len().min(12)]
        )
    }
}

/// Storage contract for analysis results.
///
/// Implementations must be thread-safe; every request handler shares one.
pub trait CacheStore: Send + Sync {
    /// Look up a result. Entries written under an older generation are misses.
    fn get(&self, key: &CacheKey) -> Result<Option<SuccessResponse>>;

    /// Store a result under the current generations.
    fn put(&self, key: &CacheKey, response: &SuccessResponse) -> Result<()>;

    /// Delete every entry, returning how many were removed.
    fn clear_all(&self) -> Result<usize>;

    /// Delete entries for one file type, returning how many were removed.
    fn clear_file_type(&self, file_type: FileType) -> Result<usize>;

    /// Current generation label.
    fn current_version(&self, kind: VersionKind) -> Result<String>;

    /// Record a new generation, returning the previous label.
    fn set_version(&self, kind: VersionKind, version: &str) -> Result<String>;

    /// Name of the store (for logging).
    fn name(&self) -> &str;
}
