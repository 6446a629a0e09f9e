// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! `ember-telemetry show` — print the cached snapshot.

use crate::cache::{CacheStore, SnapshotCache, SNAPSHOT_KEY};
use crate::cli::output;
use crate::config::{Config, Overrides};
use crate::inspect::Snapshot;
use anyhow::{Context, Result};

/// Run the show command.
pub async fn run(overrides: &Overrides) -> Result<()> {
    let config = Config::resolve(overrides)?;
    let cache = SnapshotCache::open(config.cache_dir)?;
    let snapshot = load_cached(&cache)?;
    output::print_json(&serde_json::to_value(&snapshot)?);
    Ok(())
}

/// Load and validate the cached snapshot.
pub fn load_cached(cache: &dyn CacheStore) -> Result<Snapshot> {
    let text = cache.get(SNAPSHOT_KEY)?.context(
        "no cached telemetry; run `ember-telemetry extract <url>` first",
    )?;
    serde_json::from_str(&text).context("cached telemetry is corrupt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_cached() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = SnapshotCache::open(dir.path().to_path_buf()).unwrap();
        assert!(load_cached(&cache).is_err());

        cache
            .set(
                SNAPSHOT_KEY,
                r#"{"app/app":{"type":"Application","ownProperties":[],"ownActions":[],"computedProperties":[]}}"#,
            )
            .unwrap();
        let snapshot = load_cached(&cache).unwrap();
        assert_eq!(
            snapshot.get("app/app").unwrap().telemetry().unwrap().type_name,
            "Application"
        );

        cache.set(SNAPSHOT_KEY, "[1, 2]").unwrap();
        assert!(load_cached(&cache).is_err());

        // A record cut short must not come back as `{}`.
        cache
            .set(SNAPSHOT_KEY, r#"{"app/routes/a":{"type":"Route"}}"#)
            .unwrap();
        let err = load_cached(&cache).unwrap_err();
        assert!(format!("{err:#}").contains("cached telemetry is corrupt"));
    }
}
