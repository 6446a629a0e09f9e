// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Module walker: one sequential pass over the registry.
//!
//! Per-module failures are reported on the diagnostic sink and the module is
//! left out of the snapshot. Nothing a single module does aborts the walk.

use super::classify::Classifier;
use super::meta::parse_meta;
use super::record::Snapshot;
use super::reflect::{MetaContainer, ModuleRegistry};
use super::skip::SkipList;
use tracing::{debug, warn};

/// Receiver for per-module failures. Must not block.
pub trait DiagnosticSink {
    fn module_failed(&self, path: &str, message: &str);
}

/// Source type the classifier of a registry works on.
pub type SourceOf<R> = <<R as ModuleRegistry>::Meta as MetaContainer>::Source;

/// Walk every registry path in order and build the snapshot.
pub fn walk<R, D>(
    registry: &R,
    skip: &SkipList,
    classifier: &Classifier<SourceOf<R>>,
    diagnostics: &D,
) -> Snapshot
where
    R: ModuleRegistry,
    D: DiagnosticSink + ?Sized,
{
    let mut snapshot = Snapshot::new();

    for path in registry.paths() {
        if skip.contains(&path) {
            debug!(path = %path, "skipping listed module");
            continue;
        }

        let object = match registry.resolve(&path) {
            Ok(Some(object)) => object,
            Ok(None) => continue,
            Err(e) => {
                diagnostics.module_failed(&path, &e.diagnostic_message());
                continue;
            }
        };

        let meta = registry.meta_for(object);
        match parse_meta(meta, classifier) {
            Ok(record) => {
                if !snapshot.insert(path.clone(), record) {
                    warn!(path = %path, "duplicate registry path; keeping first record");
                }
            }
            Err(e) => diagnostics.module_failed(&path, &e.diagnostic_message()),
        }
    }

    snapshot
}
