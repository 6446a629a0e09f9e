// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Telemetry Event Bus — typed events from every stage of a run.
//!
//! The EventBus is a `tokio::sync::broadcast` channel that carries
//! [`TelemetryEvent`] values. It doubles as the diagnostic channel: per-module
//! failures from the walker and messages from the page's diagnostic binding
//! are emitted here. Emitting never blocks; when no subscribers exist, events
//! are silently dropped.

use crate::inspect::walker::DiagnosticSink;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Severity of a forwarded page console call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Debug,
    Log,
    Info,
    Warn,
    Error,
}

/// Every event a run emits. Serialized to JSON for `--json` consumers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TelemetryEvent {
    // ── Run Events ────────────────────────
    /// An extraction run has started.
    ExtractionStarted {
        run_id: String,
        url: String,
        timestamp: String,
    },
    /// The page finished loading.
    NavigationComplete {
        run_id: String,
        final_url: String,
        load_time_ms: u64,
    },
    /// The walk finished and the snapshot was built.
    ExtractionComplete {
        run_id: String,
        modules: usize,
        elapsed_ms: u64,
    },
    /// Navigation or extraction failed as a whole.
    ExtractionFailed {
        run_id: String,
        stage: String,
        error: String,
    },

    // ── Diagnostic Events ─────────────────
    /// One module threw during resolution or parsing and was left out.
    ModuleFailed { path: String, message: String },
    /// A message sent through the page's diagnostic binding.
    PageDiagnostic { message: String },
    /// A console call made by the page.
    PageConsole { level: ConsoleLevel, text: String },
}

/// The central event bus for a run.
pub struct EventBus {
    sender: broadcast::Sender<TelemetryEvent>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all subscribers. Silently ignores if no subscribers.
    pub fn emit(&self, event: TelemetryEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.sender.subscribe()
    }
}

impl DiagnosticSink for EventBus {
    fn module_failed(&self, path: &str, message: &str) {
        self.emit(TelemetryEvent::ModuleFailed {
            path: path.to_string(),
            message: message.to_string(),
        });
    }
}

/// Forward bus events to the tracing subscriber until the bus closes or the
/// task is aborted.
pub fn spawn_log_forwarder(bus: &EventBus) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log_event(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("log forwarder lagged, {n} events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn log_event(event: &TelemetryEvent) {
    match event {
        TelemetryEvent::ExtractionStarted { run_id, url, .. } => {
            info!(run_id = %run_id, "extracting telemetry from {url}");
        }
        TelemetryEvent::NavigationComplete {
            final_url,
            load_time_ms,
            ..
        } => {
            info!("page loaded: {final_url} ({load_time_ms}ms)");
        }
        TelemetryEvent::ExtractionComplete {
            modules,
            elapsed_ms,
            ..
        } => {
            debug!("walk finished: {modules} modules in {elapsed_ms}ms");
        }
        TelemetryEvent::ExtractionFailed { stage, error, .. } => {
            error!(stage = %stage, "extraction failed: {error}");
        }
        TelemetryEvent::ModuleFailed { path, message } => {
            error!(path = %path, "failed to inspect module: {message}");
        }
        TelemetryEvent::PageDiagnostic { message } => {
            warn!("page: {message}");
        }
        TelemetryEvent::PageConsole { level, text } => match level {
            ConsoleLevel::Error => error!(target: "ember_telemetry::page", "{text}"),
            ConsoleLevel::Warn => warn!(target: "ember_telemetry::page", "{text}"),
            ConsoleLevel::Info | ConsoleLevel::Log => {
                info!(target: "ember_telemetry::page", "{text}")
            }
            ConsoleLevel::Debug => debug!(target: "ember_telemetry::page", "{text}"),
        },
    }
}

/// Get the RFC 3339 timestamp for the current time.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
