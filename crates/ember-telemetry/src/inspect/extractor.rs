// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Telemetry extractor: probe the page, walk the image, return the snapshot.
//!
//! The page is an isolated context. The probe goes in as script text with the
//! skip list inlined as a JSON string literal; a single JSON string comes
//! back. No handles or closures cross in either direction.

use super::classify::Classifier;
use super::error::InspectError;
use super::image::RegistryImage;
use super::record::Snapshot;
use super::skip::SkipList;
use super::walker::{walk, DiagnosticSink};
use crate::renderer::RenderContext;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

/// Name of the page-side diagnostic binding.
pub const DIAGNOSTIC_BINDING: &str = "__emberTelemetryDiagnostic";

const PROBE_SOURCE: &str = include_str!("probe.js");

/// Build the self-contained probe invocation for `skip`.
pub fn probe_script(skip: &SkipList) -> String {
    let skip_arg = Value::String(skip.to_json());
    let binding_arg = Value::String(DIAGNOSTIC_BINDING.to_string());
    format!("{PROBE_SOURCE}({skip_arg}, {binding_arg})")
}

/// Decode what the probe handed back across the boundary.
pub fn decode_probe_result(value: Value) -> Result<RegistryImage, InspectError> {
    match value {
        Value::String(text) => RegistryImage::from_json(&text),
        Value::Null => Err(InspectError::ProbeResult("null".to_string())),
        other => Err(InspectError::ProbeResult(json_kind(&other).to_string())),
    }
}

/// Walk a decoded image with the classifier the page's exposed types allow.
pub fn snapshot_from_image<D>(image: &RegistryImage, skip: &SkipList, diagnostics: &D) -> Snapshot
where
    D: DiagnosticSink + ?Sized,
{
    let classifier = Classifier::new(image.type_registry());
    debug!(registry = ?classifier.registry(), "classifier ready");
    walk(image, skip, &classifier, diagnostics)
}

/// Run the probe in `context` and build the snapshot.
///
/// Fails as a whole when the probe throws or returns something that is not a
/// registry image. Per-module failures go to `diagnostics` instead.
pub async fn extract<D>(
    context: &dyn RenderContext,
    skip: &SkipList,
    diagnostics: &D,
) -> Result<Snapshot>
where
    D: DiagnosticSink + Sync + ?Sized,
{
    let script = probe_script(skip);
    let value = context
        .execute_js(&script)
        .await
        .context("registry probe failed in page")?;

    let image = decode_probe_result(value).context("registry probe returned an unusable result")?;
    info!(
        entries = image.entries.len(),
        exposed = ?image.exposed_types,
        "registry image received"
    );

    Ok(snapshot_from_image(&image, skip, diagnostics))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
