// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Snapshot caching: store and retrieve serialized telemetry.
//!
//! One file per key under the cache directory, named `<key>.json`. Keys are
//! restricted to ASCII alphanumerics, `-` and `_` so that a file name maps
//! back to exactly one key when the index is rebuilt. A run writes only after
//! a fully successful walk, so a cached value is always a complete snapshot.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Key the extracted snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "telemetry";

const EXTENSION: &str = "json";

/// Cache collaborator interface.
pub trait CacheStore: Send {
    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// Fetch the value under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;
}

/// Cache entry with metadata.
struct CacheEntry {
    /// Path to the cached file.
    path: PathBuf,
    /// When the entry was written.
    cached_at: SystemTime,
}

/// Snapshot cache backed by the filesystem.
pub struct SnapshotCache {
    /// Base directory for cached values.
    cache_dir: PathBuf,
    /// In-memory index of cached keys.
    index: HashMap<String, CacheEntry>,
}

impl SnapshotCache {
    /// Open (creating if needed) the cache in `cache_dir`.
    ///
    /// On open, scans the directory for existing `.json` files and rebuilds
    /// the in-memory index.
    pub fn open(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)
            .with_context(|| format!("failed to create cache dir: {}", cache_dir.display()))?;

        let mut index = HashMap::new();

        if let Ok(entries) = fs::read_dir(&cache_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                    continue;
                }
                let key = path.file_stem().and_then(|s| s.to_str());
                if let Some(key) = key.filter(|k| is_valid_key(k)) {
                    let cached_at = entry
                        .metadata()
                        .and_then(|m| m.modified())
                        .unwrap_or_else(|_| SystemTime::now());
                    index.insert(key.to_string(), CacheEntry { path, cached_at });
                }
            }
        }

        tracing::debug!(
            "SnapshotCache initialized: {} entries from {}",
            index.len(),
            cache_dir.display()
        );

        Ok(Self { cache_dir, index })
    }

    /// When `key` was last written.
    pub fn cached_at(&self, key: &str) -> Option<SystemTime> {
        self.index.get(key).map(|e| e.cached_at)
    }

    /// Remove a cached value.
    pub fn invalidate(&mut self, key: &str) {
        if let Some(entry) = self.index.remove(key) {
            let _ = fs::remove_file(&entry.path);
        }
    }

    /// Remove every cached value. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let keys: Vec<String> = self.index.keys().cloned().collect();
        for key in &keys {
            self.invalidate(key);
        }
        keys.len()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Cache directory path.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            bail!("invalid cache key {key:?}: use ASCII letters, digits, '-' or '_'");
        }
        Ok(self.cache_dir.join(format!("{key}.{EXTENSION}")))
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl CacheStore for SnapshotCache {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("tmp");

        fs::write(&tmp, value)
            .with_context(|| format!("failed to write cache file: {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("failed to replace cache file: {}", path.display()))?;

        self.index.insert(
            key.to_string(),
            CacheEntry {
                path,
                cached_at: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.path_for(key)?;
        let Some(entry) = self.index.get(key) else {
            return Ok(None);
        };
        let text = fs::read_to_string(&entry.path)
            .with_context(|| format!("failed to read cache file: {}", entry.path.display()))?;
        Ok(Some(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = SnapshotCache::open(dir.path().to_path_buf()).unwrap();

        cache.set(SNAPSHOT_KEY, r#"{"app/app":{}}"#).unwrap();
        assert!(dir.path().join("telemetry.json").exists());
        assert_eq!(
            cache.get(SNAPSHOT_KEY).unwrap().as_deref(),
            Some(r#"{"app/app":{}}"#)
        );
        assert!(cache.cached_at(SNAPSHOT_KEY).is_some());
    }

    #[test]
    fn test_set_replaces_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = SnapshotCache::open(dir.path().to_path_buf()).unwrap();

        cache.set(SNAPSHOT_KEY, "{}").unwrap();
        cache.set(SNAPSHOT_KEY, r#"{"a":{}}"#).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(SNAPSHOT_KEY).unwrap().unwrap(), r#"{"a":{}}"#);
    }

    #[test]
    fn test_index_rebuilt_on_open() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut cache = SnapshotCache::open(dir.path().to_path_buf()).unwrap();
            cache.set(SNAPSHOT_KEY, "{}").unwrap();
        }
        let cache = SnapshotCache::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(cache.get(SNAPSHOT_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = SnapshotCache::open(dir.path().to_path_buf()).unwrap();

        cache.set("a", "1").unwrap();
        cache.set("b", "2").unwrap();
        cache.invalidate("a");
        assert!(cache.get("a").unwrap().is_none());
        assert!(!dir.path().join("a.json").exists());

        assert_eq!(cache.clear(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keys_survive_reopen_or_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut cache = SnapshotCache::open(dir.path().to_path_buf()).unwrap();
            cache.set("app-v2_snapshot", "{}").unwrap();
            assert!(cache.set("a/b", "1").is_err());
            assert!(cache.set("a_b.", "1").is_err());
            assert!(cache.set("", "1").is_err());
            assert!(cache.get("a/b").is_err());
        }
        std::fs::write(dir.path().join("stray.name.json"), "{}").unwrap();

        let cache = SnapshotCache::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("app-v2_snapshot").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::open(dir.path().to_path_buf()).unwrap();
        assert!(cache.get(SNAPSHOT_KEY).unwrap().is_none());
    }
}
