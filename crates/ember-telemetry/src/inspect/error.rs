// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the inspection core.

/// Errors raised while walking a module registry or decoding the page probe.
#[derive(thiserror::Error, Debug)]
pub enum InspectError {
    /// A module threw while being resolved or reflected inside the page.
    #[error("module {path} failed: {message}")]
    ModuleResolution { path: String, message: String },

    /// The metadata container carried a source but no descriptor enumeration.
    #[error("malformed reflection metadata: {0}")]
    MalformedMeta(String),

    /// The probe crossed the page boundary with something other than a JSON string.
    #[error("page probe returned a non-string result: {0}")]
    ProbeResult(String),

    /// The probe's JSON did not describe a registry image.
    #[error("failed to decode registry image: {0}")]
    ProbeDecode(#[from] serde_json::Error),
}

impl InspectError {
    /// The message text forwarded on the diagnostic channel.
    pub fn diagnostic_message(&self) -> String {
        match self {
            InspectError::ModuleResolution { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
