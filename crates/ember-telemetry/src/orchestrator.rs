// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! One extraction run: open a page, wire the diagnostic and console bridges,
//! navigate, extract, cache.
//!
//! Navigation and extraction are all-or-nothing. Either failure is reported
//! on the bus and returned; the cache is written only after a complete walk.

use crate::cache::{CacheStore, SNAPSHOT_KEY};
use crate::events::{now_timestamp, EventBus, TelemetryEvent};
use crate::inspect::{extract, Snapshot, SkipList, DIAGNOSTIC_BINDING};
use crate::renderer::{RenderContext, Renderer};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Inputs for a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub url: String,
    pub timeout_ms: u64,
    pub skip: SkipList,
}

/// Run one extraction against `options.url`.
///
/// With `cache` set, the snapshot is stored under [`SNAPSHOT_KEY`] as JSON.
pub async fn run(
    renderer: &dyn Renderer,
    cache: Option<&mut dyn CacheStore>,
    bus: Arc<EventBus>,
    options: &RunOptions,
) -> Result<Snapshot> {
    let run_id = uuid::Uuid::new_v4().to_string();
    let start = Instant::now();

    bus.emit(TelemetryEvent::ExtractionStarted {
        run_id: run_id.clone(),
        url: options.url.clone(),
        timestamp: now_timestamp(),
    });

    let mut context = renderer
        .new_context()
        .await
        .context("failed to open a browser page")?;

    let outcome = drive(context.as_mut(), &bus, &run_id, options).await;

    if let Err(e) = context.close().await {
        warn!("failed to close page: {e:#}");
    }

    let snapshot = match outcome {
        Ok(snapshot) => snapshot,
        Err((stage, e)) => {
            bus.emit(TelemetryEvent::ExtractionFailed {
                run_id,
                stage: stage.to_string(),
                error: format!("{e:#}"),
            });
            return Err(e);
        }
    };

    if let Some(cache) = cache {
        let json = serde_json::to_string(&snapshot).context("failed to serialize snapshot")?;
        cache
            .set(SNAPSHOT_KEY, &json)
            .context("failed to cache snapshot")?;
    }

    bus.emit(TelemetryEvent::ExtractionComplete {
        run_id,
        modules: snapshot.len(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    });

    Ok(snapshot)
}

/// Failure stage paired with its error.
type StageError = (&'static str, anyhow::Error);

async fn drive(
    context: &mut dyn RenderContext,
    bus: &Arc<EventBus>,
    run_id: &str,
    options: &RunOptions,
) -> std::result::Result<Snapshot, StageError> {
    bridge(context, bus).await.map_err(|e| ("setup", e))?;

    let nav = context
        .navigate(&options.url, options.timeout_ms)
        .await
        .with_context(|| format!("failed to load {}", options.url))
        .map_err(|e| ("navigation", e))?;

    bus.emit(TelemetryEvent::NavigationComplete {
        run_id: run_id.to_string(),
        final_url: nav.final_url,
        load_time_ms: nav.load_time_ms,
    });

    extract(&*context, &options.skip, bus.as_ref())
        .await
        .map_err(|e| ("extraction", e))
}

/// Route the page's diagnostic binding and console output onto the bus.
async fn bridge(context: &dyn RenderContext, bus: &Arc<EventBus>) -> Result<()> {
    let diagnostics = Arc::clone(bus);
    context
        .expose_function(
            DIAGNOSTIC_BINDING,
            Box::new(move |message| {
                diagnostics.emit(TelemetryEvent::PageDiagnostic { message });
            }),
        )
        .await?;

    let console = Arc::clone(bus);
    context
        .forward_console(Box::new(move |msg| {
            console.emit(TelemetryEvent::PageConsole {
                level: msg.level,
                text: msg.text,
            });
        }))
        .await?;

    Ok(())
}
