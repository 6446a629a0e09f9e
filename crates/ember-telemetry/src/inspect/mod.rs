// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Inspection core: registry walk, metadata parsing, classification.
//!
//! Leaf-first: [`classify`] decides an object's framework abstraction,
//! [`meta`] turns a metadata container into a [`TelemetryRecord`],
//! [`walker`] runs both over every registry path, and [`extractor`] drives
//! the walk from a live page through the [`image`] the page probe returns.

pub mod classify;
pub mod error;
pub mod extractor;
pub mod image;
pub mod meta;
pub mod record;
pub mod reflect;
pub mod skip;
pub mod walker;

pub use classify::{Classifier, TypeRegistry, FALLBACK_TYPE, TAXONOMY};
pub use error::InspectError;
pub use extractor::{extract, DIAGNOSTIC_BINDING};
pub use image::RegistryImage;
pub use meta::parse_meta;
pub use record::{ModuleTelemetry, Snapshot, TelemetryRecord};
pub use skip::SkipList;
pub use walker::{walk, DiagnosticSink};
