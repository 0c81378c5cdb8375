//! In-memory cache store.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::error::{Result, SieveError};
use crate::fingerprint::FileType;
use crate::response::SuccessResponse;

use super::{CacheKey, CacheStore, VersionKind};

/// Generation label used before any bump.
pub const INITIAL_VERSION: &str = "initial";

/// Default entry bound for [`MemoryCacheStore::new`].
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Clone)]
struct Entry {
    response: SuccessResponse,
    model_version: String,
    rag_version: String,
    stored_at: DateTime<Utc>,
    /// Insertion counter; orders entries stored within the same clock tick.
    seq: u64,
}

#[derive(Debug)]
struct State {
    entries: HashMap<CacheKey, Entry>,
    model_version: String,
    rag_version: String,
    next_seq: u64,
}

impl State {
    fn is_current(&self, entry: &Entry) -> bool {
        entry.model_version == self.model_version && entry.rag_version == self.rag_version
    }

    /// Make room for one more entry: stale generations go first, then the
    /// oldest current entries.
    fn make_room(&mut self, max_entries: usize) {
        if self.entries.len() < max_entries {
            return;
        }

        let (model, rag) = (self.model_version.clone(), self.rag_version.clone());
        self.entries
            .retain(|_, e| e.model_version == model && e.rag_version == rag);

        while self.entries.len() >= max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, e)| (e.stored_at, e.seq))
                .map(|(k, _)| k.clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

/// Process-local [`CacheStore`] guarded by a `RwLock`.
///
/// Holds at most `max_entries` results. When full, entries from older
/// generations are dropped first, then the oldest by store time.
#[derive(Debug)]
pub struct MemoryCacheStore {
    state: RwLock<State>,
    max_entries: usize,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// A store bounded to `max_entries`; zero disables storing.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            state: RwLock::new(State {
                entries: HashMap::new(),
                model_version: INITIAL_VERSION.to_string(),
                rag_version: INITIAL_VERSION.to_string(),
                next_seq: 0,
            }),
            max_entries,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> SieveError {
    SieveError::Cache("cache lock poisoned".to_string())
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &CacheKey) -> Result<Option<SuccessResponse>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .entries
            .get(key)
            .filter(|e| state.is_current(e))
            .map(|e| e.response.clone()))
    }

    fn put(&self, key: &CacheKey, response: &SuccessResponse) -> Result<()> {
        if self.max_entries == 0 {
            return Ok(());
        }
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.entries.contains_key(key) {
            state.make_room(self.max_entries);
        }
        let entry = Entry {
            response: response.clone(),
            model_version: state.model_version.clone(),
            rag_version: state.rag_version.clone(),
            stored_at: Utc::now(),
            seq: state.next_seq,
        };
        state.next_seq += 1;
        state.entries.insert(key.clone(), entry);
        Ok(())
    }

    fn clear_all(&self) -> Result<usize> {
        let mut state = self.state.write().map_err(poisoned)?;
        let removed = state.entries.len();
        state.entries.clear();
        Ok(removed)
    }

    fn clear_file_type(&self, file_type: FileType) -> Result<usize> {
        let mut state = self.state.write().map_err(poisoned)?;
        let before = state.entries.len();
        state.entries.retain(|key, _| key.file_type != file_type);
        Ok(before - state.entries.len())
    }

    fn current_version(&self, kind: VersionKind) -> Result<String> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(match kind {
            VersionKind::Model => state.model_version.clone(),
            VersionKind::Rag => state.rag_version.clone(),
        })
    }

    fn set_version(&self, kind: VersionKind, version: &str) -> Result<String> {
        let mut state = self.state.write().map_err(poisoned)?;
        let slot = match kind {
            VersionKind::Model => &mut state.model_version,
            VersionKind::Rag => &mut state.rag_version,
        };
        Ok(std::mem::replace(slot, version.to_string()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::SchemaFingerprint;
    use crate::response::{AnalysisMetadata, NormalizedResponse, ResponseBuilder};

    fn keyed(n: usize) -> (CacheKey, SuccessResponse) {
        let (_, response) = stored(FileType::Json);
        let key = CacheKey::new(
            FileType::Json,
            format!("sha256:{:064x}", n),
            &SchemaFingerprint::empty(FileType::Json),
        );
        (key, response)
    }

    fn stored(file_type: FileType) -> (CacheKey, SuccessResponse) {
        let key = CacheKey::new(file_type, format!("sha256:{}", file_type), &SchemaFingerprint::empty(file_type));
        let NormalizedResponse::Ok(response) =
            ResponseBuilder::default().success(&[], AnalysisMetadata::new("r", file_type), None)
        else {
            panic!("expected ok response");
        };
        (key, response)
    }

    #[test]
    fn test_put_get() {
        let store = MemoryCacheStore::new();
        let (key, response) = stored(FileType::Json);
        assert!(store.get(&key).unwrap().is_none());
        store.put(&key, &response).unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(response));
    }

    #[test]
    fn test_version_bump_makes_entries_stale() {
        let store = MemoryCacheStore::new();
        let (key, response) = stored(FileType::Csv);
        store.put(&key, &response).unwrap();

        let previous = store.set_version(VersionKind::Model, "m2").unwrap();
        assert_eq!(previous, INITIAL_VERSION);
        assert!(store.get(&key).unwrap().is_none());
        // Not deleted, just unreachable.
        assert_eq!(store.len(), 1);

        store.put(&key, &response).unwrap();
        assert!(store.get(&key).unwrap().is_some());
        store.set_version(VersionKind::Rag, "r2").unwrap();
        assert!(store.get(&key).unwrap().is_none());
    }

    #[test]
    fn test_clear_scopes() {
        let store = MemoryCacheStore::new();
        for ft in FileType::ALL {
            let (key, response) = stored(ft);
            store.put(&key, &response).unwrap();
        }
        assert_eq!(store.clear_file_type(FileType::Csv).unwrap(), 1);
        assert_eq!(store.clear_file_type(FileType::Csv).unwrap(), 0);
        assert_eq!(store.clear_all().unwrap(), 3);
        assert!(store.is_empty());
    }

    #[test]
    fn test_capacity_bound_evicts_oldest() {
        let store = MemoryCacheStore::with_capacity(3);
        let keys: Vec<CacheKey> = (0..5)
            .map(|n| {
                let (key, response) = keyed(n);
                store.put(&key, &response).unwrap();
                key
            })
            .collect();

        assert_eq!(store.len(), 3);
        assert!(store.get(&keys[0]).unwrap().is_none());
        assert!(store.get(&keys[1]).unwrap().is_none());
        assert!(store.get(&keys[4]).unwrap().is_some());

        // Overwriting a present key never evicts.
        let (_, response) = keyed(4);
        store.put(&keys[4], &response).unwrap();
        assert_eq!(store.len(), 3);
        assert!(store.get(&keys[2]).unwrap().is_some());
    }

    #[test]
    fn test_capacity_bound_drops_stale_generations_first() {
        let store = MemoryCacheStore::with_capacity(3);
        let (old_a, response) = keyed(0);
        let (old_b, _) = keyed(1);
        store.put(&old_a, &response).unwrap();
        store.put(&old_b, &response).unwrap();
        store.set_version(VersionKind::Rag, "r2").unwrap();

        let (fresh, _) = keyed(2);
        store.put(&fresh, &response).unwrap();
        assert_eq!(store.len(), 3);

        // Full: the two stale entries go, the current one stays.
        let (next, _) = keyed(3);
        store.put(&next, &response).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get(&fresh).unwrap().is_some());
        assert!(store.get(&next).unwrap().is_some());
    }

    #[test]
    fn test_many_distinct_puts_stay_bounded() {
        let store = MemoryCacheStore::with_capacity(100);
        for n in 0..1_000 {
            let (key, response) = keyed(n);
            store.put(&key, &response).unwrap();
        }
        assert_eq!(store.len(), 100);
        assert_eq!(MemoryCacheStore::new().max_entries(), DEFAULT_MAX_ENTRIES);

        let disabled = MemoryCacheStore::with_capacity(0);
        let (key, response) = keyed(0);
        disabled.put(&key, &response).unwrap();
        assert!(disabled.is_empty());
    }
}
