// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Environment readiness check.

use crate::cache::{SnapshotCache, SNAPSHOT_KEY};
use crate::cli::output::{self, Styled};
use crate::config::{Config, Overrides};
use crate::renderer::chromium::find_chromium;
use anyhow::Result;

/// Check Chromium availability and the cache directory.
pub async fn run(overrides: &Overrides) -> Result<()> {
    let config = Config::resolve(overrides)?;
    let chromium = config.chromium_path.clone().or_else(find_chromium);
    let cache = SnapshotCache::open(config.cache_dir.clone());
    let cached_at = cache
        .as_ref()
        .ok()
        .and_then(|c| c.cached_at(SNAPSHOT_KEY))
        .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339());
    let ready = chromium.is_some() && cache.is_ok();

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "chromium": chromium.as_ref().map(|p| p.display().to_string()),
            "cacheDir": config.cache_dir.display().to_string(),
            "cacheWritable": cache.is_ok(),
            "snapshotCachedAt": cached_at,
            "timeoutMs": config.timeout_ms,
            "ready": ready,
        }));
        return Ok(());
    }

    let s = Styled::new();
    println!("Ember Telemetry Doctor");
    println!("======================");
    println!();
    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    match &chromium {
        Some(path) => println!("{} Chromium found: {}", s.ok_sym(), path.display()),
        None => println!(
            "{} Chromium NOT found. Set EMBER_TELEMETRY_CHROMIUM_PATH or install Chrome.",
            s.warn_sym()
        ),
    }

    match &cache {
        Ok(_) => println!("{} Cache dir: {}", s.ok_sym(), config.cache_dir.display()),
        Err(e) => println!("{} Cache dir unusable: {e:#}", s.warn_sym()),
    }

    match &cached_at {
        Some(at) => println!("{} Cached snapshot from {at}", s.ok_sym()),
        None => println!("{} No cached snapshot yet", s.warn_sym()),
    }

    println!("Navigation timeout: {}ms", config.timeout_ms);
    println!();
    println!("Status: {}", if ready { "READY" } else { "NOT READY" });

    Ok(())
}
