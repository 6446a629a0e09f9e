// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! `ember-telemetry extract <url>` — extract telemetry from a live app.

use crate::cache::{CacheStore, SnapshotCache};
use crate::cli::output;
use crate::config::{Config, Overrides};
use crate::events::{self, EventBus};
use crate::orchestrator::{self, RunOptions};
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Event buffer for one run.
const BUS_CAPACITY: usize = 1024;

/// How long the log forwarder may keep draining after the run.
const DRAIN_TIMEOUT: Duration = Duration::from_millis(200);

/// Run the extract command.
pub async fn run(url: &str, overrides: &Overrides, no_cache: bool) -> Result<()> {
    let url = parse_target(url)?;
    let config = Config::resolve(overrides)?;

    let bus = Arc::new(EventBus::new(BUS_CAPACITY));
    let forwarder = events::spawn_log_forwarder(&bus);

    let mut cache = if no_cache {
        None
    } else {
        Some(SnapshotCache::open(config.cache_dir.clone())?)
    };

    let renderer = ChromiumRenderer::new(config.chromium_path.as_deref()).await?;

    let options = RunOptions {
        url: url.to_string(),
        timeout_ms: config.timeout_ms,
        skip: config.skip_list(),
    };
    let result = orchestrator::run(
        &renderer,
        cache.as_mut().map(|c| c as &mut dyn CacheStore),
        Arc::clone(&bus),
        &options,
    )
    .await;

    if let Err(e) = renderer.shutdown().await {
        warn!("{e:#}");
    }

    drop(bus);
    let _ = tokio::time::timeout(DRAIN_TIMEOUT, forwarder).await;

    let snapshot = result?;

    output::print_json(&serde_json::to_value(&snapshot).context("failed to serialize snapshot")?);
    info!("telemetry extraction complete: {} modules", snapshot.len());
    Ok(())
}

/// Accept only absolute http(s) or file URLs.
fn parse_target(raw: &str) -> Result<url::Url> {
    let url = url::Url::parse(raw).with_context(|| format!("invalid URL: {raw}"))?;
    match url.scheme() {
        "http" | "https" | "file" => Ok(url),
        other => bail!("unsupported URL scheme: {other}"),
    }
}
