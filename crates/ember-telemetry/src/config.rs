// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration loading and resolution.
//!
//! Each setting resolves in order: explicit CLI value, environment variable,
//! `./.ember-telemetry.json`, built-in default.

use crate::inspect::SkipList;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_CHROMIUM_PATH: &str = "EMBER_TELEMETRY_CHROMIUM_PATH";
pub const ENV_CACHE_DIR: &str = "EMBER_TELEMETRY_CACHE_DIR";
pub const ENV_TIMEOUT_MS: &str = "EMBER_TELEMETRY_TIMEOUT_MS";

/// Project-local config file, looked up in the working directory.
pub const CONFIG_FILE: &str = ".ember-telemetry.json";

/// Default page-load budget.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub chromium_path: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
    pub skip: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
struct FileConfig {
    chromium_path: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    timeout_ms: Option<u64>,
    skip: Vec<String>,
}

/// Fully resolved settings for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Explicit Chromium binary; `None` means discover it.
    pub chromium_path: Option<PathBuf>,
    pub cache_dir: PathBuf,
    pub timeout_ms: u64,
    /// Paths skipped on top of the built-in list.
    pub extra_skip: Vec<String>,
}

impl Config {
    /// Resolve against the process environment and `./.ember-telemetry.json`.
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let file = load_file(Path::new(CONFIG_FILE))?;
        Self::resolve_with(overrides, |key| std::env::var(key).ok(), file)
    }

    fn resolve_with<E>(overrides: &Overrides, env: E, file: Option<FileConfig>) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();

        let chromium_path = overrides
            .chromium_path
            .clone()
            .or_else(|| env(ENV_CHROMIUM_PATH).map(PathBuf::from))
            .or(file.chromium_path);

        let cache_dir = overrides
            .cache_dir
            .clone()
            .or_else(|| env(ENV_CACHE_DIR).map(PathBuf::from))
            .or(file.cache_dir)
            .unwrap_or_else(default_cache_dir);

        let timeout_ms = match overrides.timeout_ms {
            Some(ms) => ms,
            None => match env(ENV_TIMEOUT_MS) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{ENV_TIMEOUT_MS} is not a number: {raw}"))?,
                None => file.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
            },
        };

        let mut extra_skip = file.skip;
        extra_skip.extend(overrides.skip.iter().cloned());

        Ok(Self {
            chromium_path,
            cache_dir,
            timeout_ms,
            extra_skip,
        })
    }

    /// Built-in skip list plus configured extras.
    pub fn skip_list(&self) -> SkipList {
        SkipList::with_extra(self.extra_skip.iter().cloned())
    }
}

fn load_file(path: &Path) -> Result<Option<FileConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file = serde_json::from_str(&text)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(Some(file))
}

/// `~/.ember-telemetry`.
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".ember-telemetry")
}

fn default_cache_dir() -> PathBuf {
    home_dir().join("cache")
}
