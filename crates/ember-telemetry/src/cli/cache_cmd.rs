// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! `ember-telemetry cache clear` — drop cached snapshots.

use crate::cache::SnapshotCache;
use crate::cli::output;
use crate::config::{Config, Overrides};
use anyhow::Result;

/// Clear the cache.
pub async fn run_clear(overrides: &Overrides) -> Result<()> {
    let config = Config::resolve(overrides)?;
    let mut cache = SnapshotCache::open(config.cache_dir)?;
    let removed = cache.clear();

    if output::is_json() {
        output::print_json(&serde_json::json!({ "removed": removed }));
    } else if !output::is_quiet() {
        println!("Removed {removed} cached entr{}.", if removed == 1 { "y" } else { "ies" });
    }
    Ok(())
}
