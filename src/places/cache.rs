//! File-based search cache at ~/.legwork/places.json.
//!
//! Keys are trimmed, lower-cased queries. Entries older than the TTL are
//! ignored on read and pruned on the next write.

use super::types::Place;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TTL_SECS: i64 = 7 * 24 * 3600;

#[derive(Serialize, Deserialize, Clone)]
struct CacheEntry {
    places: Vec<Place>,
    timestamp: i64,
}

/// Cached suggestion lists for the proxying endpoint.
pub struct PlaceCache {
    path: Option<PathBuf>,
    ttl_ms: i64,
    entries: HashMap<String, CacheEntry>,
}

impl PlaceCache {
    /// Load from the default location (~/.legwork/places.json).
    pub fn load(ttl_secs: i64) -> Self {
        Self::load_from(Self::default_path(), ttl_secs)
    }

    /// Load from a specific path.
    pub fn load_from(path: PathBuf, ttl_secs: i64) -> Self {
        let entries = Self::read_file(&path).unwrap_or_default();
        Self {
            path: Some(path),
            ttl_ms: ttl_secs.saturating_mul(1000),
            entries,
        }
    }

    /// A cache that never touches disk.
    pub fn in_memory(ttl_secs: i64) -> Self {
        Self {
            path: None,
            ttl_ms: ttl_secs.saturating_mul(1000),
            entries: HashMap::new(),
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".legwork")
            .join("places.json")
    }

    fn read_file(path: &Path) -> Option<HashMap<String, CacheEntry>> {
        let data = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&data) {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable place cache");
                None
            }
        }
    }

    fn key(query: &str) -> String {
        query.trim().to_lowercase()
    }

    fn fresh(&self, entry: &CacheEntry, now: i64) -> bool {
        now - entry.timestamp <= self.ttl_ms
    }

    /// Cached places for `query`, or None if missing or expired.
    pub fn get(&self, query: &str) -> Option<Vec<Place>> {
        let entry = self.entries.get(&Self::key(query))?;
        let now = chrono::Utc::now().timestamp_millis();
        if !self.fresh(entry, now) {
            return None;
        }
        Some(entry.places.clone())
    }

    /// Store a result list and persist.
    pub fn put(&mut self, query: &str, places: &[Place]) {
        let now = chrono::Utc::now().timestamp_millis();
        self.entries.insert(
            Self::key(query),
            CacheEntry {
                places: places.to_vec(),
                timestamp: now,
            },
        );
        let ttl = self.ttl_ms;
        self.entries.retain(|_, e| now - e.timestamp <= ttl);
        self.persist();
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    tracing::warn!(path = %path.display(), error = %e, "could not write place cache");
                }
            }
            Err(e) => tracing::warn!(error = %e, "could not serialise place cache"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cache() -> (PlaceCache, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("places.json");
        (PlaceCache::load_from(path, DEFAULT_TTL_SECS), dir)
    }

    fn calgary() -> Vec<Place> {
        vec![Place::new("Calgary, Alberta, Canada", 51.05, -114.07)]
    }

    #[test]
    fn test_put_get_case_insensitive() {
        let (mut cache, _dir) = test_cache();
        cache.put("Calgary", &calgary());
        assert_eq!(cache.get("  CALGARY "), Some(calgary()));
        assert!(cache.get("edmonton").is_none());
    }

    #[test]
    fn test_persistence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("places.json");
        {
            let mut cache = PlaceCache::load_from(path.clone(), DEFAULT_TTL_SECS);
            cache.put("calgary", &calgary());
        }
        let reloaded = PlaceCache::load_from(path, DEFAULT_TTL_SECS);
        assert_eq!(reloaded.get("calgary"), Some(calgary()));
    }

    #[test]
    fn test_expired_entries_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("places.json");
        let stale = r#"{
            "calgary": {
                "places": [{"title": "Calgary", "lat": 51.05, "lng": -114.07}],
                "timestamp": 0
            }
        }"#;
        fs::write(&path, stale).unwrap();

        let cache = PlaceCache::load_from(path, DEFAULT_TTL_SECS);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("calgary").is_none());
    }

    #[test]
    fn test_put_prunes_expired() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("places.json");
        fs::write(&path, r#"{"old": {"places": [], "timestamp": 0}}"#).unwrap();

        let mut cache = PlaceCache::load_from(path, DEFAULT_TTL_SECS);
        cache.put("calgary", &calgary());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("places.json");
        fs::write(&path, "not json").unwrap();
        let cache = PlaceCache::load_from(path, DEFAULT_TTL_SECS);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_in_memory_cache() {
        let mut cache = PlaceCache::in_memory(DEFAULT_TTL_SECS);
        cache.put("x", &[]);
        assert_eq!(cache.get("x"), Some(vec![]));
    }
}
