// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use ember_telemetry::cli;
use ember_telemetry::cli::output::{self, ENV_JSON, ENV_NO_COLOR, ENV_QUIET};
use ember_telemetry::config::Overrides;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ember-telemetry",
    about = "Extract runtime structural telemetry from a live Ember application",
    version,
    after_help = "Run 'ember-telemetry <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Cache directory (default ~/.ember-telemetry/cache)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an app in headless Chromium and extract its telemetry
    Extract {
        /// Application URL (e.g. "http://localhost:4200")
        url: String,
        /// Page-load timeout in milliseconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Additional module path to skip. Can be repeated.
        #[arg(long = "skip")]
        skip: Vec<String>,
        /// Chromium binary to launch
        #[arg(long)]
        chromium: Option<PathBuf>,
        /// Do not write the snapshot to the cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Print the cached snapshot
    Show,
    /// Manage the snapshot cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove cached snapshots
    Clear,
}

fn init_tracing(cli: &Cli) {
    let default = if cli.verbose {
        "ember_telemetry=debug"
    } else if cli.quiet {
        "ember_telemetry=warn"
    } else {
        "ember_telemetry=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.with_ansi(!cli.no_color).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var(ENV_JSON, "1");
    }
    if cli.quiet {
        std::env::set_var(ENV_QUIET, "1");
    }
    if cli.no_color {
        std::env::set_var(ENV_NO_COLOR, "1");
    }

    init_tracing(&cli);

    let mut overrides = Overrides {
        cache_dir: cli.cache_dir.clone(),
        ..Default::default()
    };

    let result = match cli.command {
        Commands::Extract {
            url,
            timeout,
            skip,
            chromium,
            no_cache,
        } => {
            overrides.timeout_ms = timeout;
            overrides.skip = skip;
            overrides.chromium_path = chromium;
            cli::extract_cmd::run(&url, &overrides, no_cache).await
        }
        Commands::Show => cli::show_cmd::run(&overrides).await,
        Commands::Cache {
            action: CacheAction::Clear,
        } => cli::cache_cmd::run_clear(&overrides).await,
        Commands::Doctor => cli::doctor::run(&overrides).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "ember-telemetry", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if output::is_json() {
            output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        } else if !output::is_quiet() {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
