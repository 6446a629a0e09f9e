// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI subcommand implementations for the ember-telemetry binary.

pub mod cache_cmd;
pub mod doctor;
pub mod extract_cmd;
pub mod output;
pub mod show_cmd;
