//! Terminal driver and entry point.
//!
//! Resolves configuration (defaults, then the TOML file, then CLI flags),
//! installs tracing, builds the application context and runs the interactive
//! loop on stdin/stdout.
//!
//! # Commands
//!
//! Typing a line replaces the query; it is searched once input has been quiet
//! for the debounce period. An empty line searches immediately. Lines starting
//! with `:` are commands; `:help` lists them.

#![allow(clippy::multiple_crate_versions)]

use bookfinder::app::runtime;
use bookfinder::infrastructure::{default_config_file, expand_tilde};
use bookfinder::observability::init_tracing;
use bookfinder::{Config, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Search the Open Library catalog from the terminal
#[derive(Parser, Debug)]
#[command(name = "bookfinder")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.config/bookfinder/config.toml)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalog API base URL
    #[arg(long = "catalog-host", value_name = "URL")]
    catalog_host: Option<String>,

    /// Cover image base URL
    #[arg(long = "cover-host", value_name = "URL")]
    cover_host: Option<String>,

    /// Directory for the library file and span export
    #[arg(long = "data-dir", value_name = "DIR")]
    data_dir: Option<String>,

    /// Quiet period before typed input is searched
    #[arg(long = "debounce-ms", value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Tracing level (trace, debug, info, warn, error)
    #[arg(long = "trace-level", value_name = "LEVEL")]
    trace_level: Option<String>,
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => match default_config_file().filter(|path| path.exists()) {
                Some(path) => Config::from_toml_file(&path)?,
                None => Config::default(),
            },
        };

        if let Some(host) = &self.catalog_host {
            config.catalog_host.clone_from(host);
        }
        if let Some(host) = &self.cover_host {
            config.cover_host.clone_from(host);
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = expand_tilde(dir);
        }
        if let Some(ms) = self.debounce_ms {
            config.debounce_ms = ms;
        }
        if let Some(level) = &self.trace_level {
            config.trace_level.clone_from(level);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("bookfinder: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _guard = init_tracing(&config);
    tracing::debug!(config = ?config, "configuration resolved");

    let ctx = match bookfinder::initialize(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            eprintln!("bookfinder: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime::run(ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "session failed");
            eprintln!("bookfinder: {e}");
            ExitCode::FAILURE
        }
    }
}
