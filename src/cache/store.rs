// In-memory TTL cache for GitHub API responses.
// Memoizes repository stats, file trees, and snippet blobs so repeated
// analyses of the same repository skip redundant (rate-limited) API calls.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::github::{FileTree, RepoStats};

use super::key::CacheKey;

/// Default TTL for cached responses: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// A cached payload. The store is value-shape-agnostic beyond this closed
/// set; it returns whatever was written, unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    /// Repository statistics record.
    Stats(RepoStats),
    /// File tree listing for a branch.
    Tree(FileTree),
    /// Raw text blob (concatenated file snippets).
    Text(String),
}

/// A value together with its write timestamp.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: CachedValue,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(value: CachedValue) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
        }
    }

    /// Check whether this entry has outlived the given TTL.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        let elapsed = Utc::now()
            .signed_duration_since(self.stored_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed >= ttl
    }
}

/// Structural snapshot of the store for the administration view.
///
/// `keys` is the raw key list: entries that have logically expired are
/// still reported until they are overwritten or explicitly cleared. This
/// is deliberate — the admin view shows what is physically held, not what
/// a read would currently serve.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<CacheKey>,
}

/// Process-wide response cache.
///
/// One instance is created at startup and shared (via `Arc`) by every
/// collaborator, so a value fetched for one view is a hit for the next.
/// Tests construct their own instances to avoid cross-test leakage.
///
/// Every operation takes the mutex for its full duration and performs no
/// I/O, so none of them can fail: a miss and a zero removal count are
/// ordinary outcomes.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `key`, stamping the current time.
    pub fn write(&self, key: CacheKey, value: CachedValue) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key, CacheEntry::new(value));
    }

    /// Read with the default 5-minute TTL.
    pub fn read(&self, key: &CacheKey) -> Option<CachedValue> {
        self.read_with_ttl(key, DEFAULT_TTL)
    }

    /// Return the stored value only if an entry exists and is younger than
    /// `ttl`. Non-destructive: an expired entry is masked from this read
    /// but stays in the store until overwritten or explicitly cleared.
    pub fn read_with_ttl(&self, key: &CacheKey, ttl: Duration) -> Option<CachedValue> {
        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if !entry.is_expired(ttl) => Some(entry.value.clone()),
            _ => None,
        }
    }

    /// Remove a single entry. Returns whether anything was removed;
    /// repeated calls on an absent key report false.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key).is_some()
    }

    /// Remove every entry for exactly this (owner, repo) pair, across all
    /// categories. Returns the number of entries removed. Matching is on
    /// the structured key fields, so near-duplicate names ("foo/barbaz"
    /// next to "foo/bar") are never swept up.
    pub fn invalidate_repository(&self, owner: &str, repo: &str) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|key, _| !key.is_for_repo(owner, repo));
        before - entries.len()
    }

    /// Empty the store, returning how many entries it held.
    pub fn invalidate_all(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let count = entries.len();
        entries.clear();
        count
    }

    /// Snapshot entry count and key list for the administration view.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().unwrap();
        let mut keys: Vec<CacheKey> = entries.keys().cloned().collect();
        keys.sort_by_key(|k| k.to_string());
        CacheStats {
            size: entries.len(),
            keys,
        }
    }

    /// Rewind an entry's timestamp, simulating the passage of time.
    #[cfg(test)]
    fn backdate(&self, key: &CacheKey, age: Duration) {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get_mut(key) {
            entry.stored_at =
                Utc::now() - chrono::Duration::from_std(age).expect("age out of range");
        }
    }
}
