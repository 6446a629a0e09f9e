// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Module paths excluded from extraction.

use std::collections::BTreeSet;

/// Modules that are never resolved. Requiring them eagerly outside a test
/// run either throws or boots test infrastructure into the live app.
pub const DEFAULT_SKIP_LIST: &[&str] = &[
    "ember-cli-test-loader/test-support/index",
    "ember-qunit/index",
    "ember-qunit/test-loader",
    "@ember/test-helpers/index",
    "ember-resolver/features",
];

/// A set of skipped module paths. Always contains [`DEFAULT_SKIP_LIST`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipList {
    paths: BTreeSet<String>,
}

impl SkipList {
    /// The default list extended with `extra`. Extensions can only add.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        list.paths.extend(extra.into_iter().map(Into::into));
        list
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// JSON array form, as handed to the page probe.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.paths).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self {
            paths: DEFAULT_SKIP_LIST.iter().map(|p| p.to_string()).collect(),
        }
    }
}
