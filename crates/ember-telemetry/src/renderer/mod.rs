// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Renderer abstraction for browser-based page inspection.
//!
//! Defines the `Renderer` and `RenderContext` traits that abstract over
//! the browser engine (currently Chromium via chromiumoxide).

pub mod chromium;

use crate::events::ConsoleLevel;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of navigating to a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// A console call made by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub text: String,
}

/// Host-side handler for an exposed page function. Receives the string the
/// page passed in.
pub type HostCallback = Box<dyn Fn(String) + Send + Sync>;

/// Host-side handler for page console output.
pub type ConsoleCallback = Box<dyn Fn(ConsoleMessage) + Send + Sync>;

/// A browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<()>;
}

/// A single browser context (tab).
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Make `window[name]` callable from the page. Calls are delivered to
    /// `callback` asynchronously; the page never waits for them.
    ///
    /// Must be called before navigating so the binding exists on load.
    async fn expose_function(&self, name: &str, callback: HostCallback) -> Result<()>;
    /// Deliver every page console call to `callback`.
    async fn forward_console(&self, callback: ConsoleCallback) -> Result<()>;
    /// Navigate to a URL with a timeout.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult>;
    /// Execute JavaScript in the page context and return the result.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value>;
    /// Close this context.
    async fn close(self: Box<Self>) -> Result<()>;
}
