// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Output helpers shared by the subcommands.
//!
//! Global flags are published through environment variables by `main` so
//! every module can check them without threading a config value around.

use std::io::IsTerminal;

pub const ENV_JSON: &str = "EMBER_TELEMETRY_JSON";
pub const ENV_QUIET: &str = "EMBER_TELEMETRY_QUIET";
pub const ENV_NO_COLOR: &str = "EMBER_TELEMETRY_NO_COLOR";

fn flag(name: &str) -> bool {
    std::env::var(name).map(|v| v == "1").unwrap_or(false)
}

/// `--json` was given.
pub fn is_json() -> bool {
    flag(ENV_JSON)
}

/// `--quiet` was given.
pub fn is_quiet() -> bool {
    flag(ENV_QUIET)
}

/// Print a JSON value to stdout, pretty unless `--json` asked for one line.
pub fn print_json(value: &serde_json::Value) {
    let text = if is_json() {
        value.to_string()
    } else {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    };
    println!("{text}");
}

/// Status markers, colored when stdout is a terminal.
pub struct Styled {
    color: bool,
}

impl Styled {
    pub fn new() -> Self {
        Self {
            color: !flag(ENV_NO_COLOR)
                && std::env::var_os("NO_COLOR").is_none()
                && std::io::stdout().is_terminal(),
        }
    }

    pub fn ok_sym(&self) -> &'static str {
        if self.color {
            "\x1b[32m[OK]\x1b[0m"
        } else {
            "[OK]"
        }
    }

    pub fn warn_sym(&self) -> &'static str {
        if self.color {
            "\x1b[33m[!!]\x1b[0m"
        } else {
            "[!!]"
        }
    }
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}
