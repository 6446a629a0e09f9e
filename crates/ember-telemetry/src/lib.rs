// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Ember telemetry — structural metadata extraction from live Ember apps.
//!
//! Drives headless Chromium to an application URL, probes the live module
//! registry through the framework's reflection API, and produces a
//! [`inspect::Snapshot`] mapping every module path to what it defines.

pub mod cache;
pub mod cli;
pub mod config;
pub mod events;
pub mod inspect;
pub mod orchestrator;
pub mod renderer;
