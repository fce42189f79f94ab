//! Command-line interface for stylus.
//!
//! stylus is a single interactive command, so the CLI surface is just
//! startup flags: endpoint/theme overrides, an alternate config file, and
//! an optional log file. Because the TUI owns stdout, logging is written to
//! a file when requested and disabled otherwise.

use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{Result, StylusError};
use crate::tui;

/// Interactive terminal client for Code Society notebooks.
#[derive(Debug, Parser)]
#[command(name = "stylus", version, about)]
pub struct Args {
    /// GraphQL endpoint of the notebooks service.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// TUI theme (dark, light).
    #[arg(long)]
    pub theme: Option<String>,

    /// Path to an alternate config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write debug logs to this file.
    #[arg(long, env = "STYLUS_LOG")]
    pub log_file: Option<PathBuf>,
}

/// Parse arguments, assemble configuration, and run the TUI.
pub fn run() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_file_logging(path)?;
    }

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(theme) = args.theme {
        config.theme = theme;
    }

    info!(endpoint = %config.endpoint, theme = %config.theme, "starting");

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| StylusError::io("Failed to start async runtime", e))?;
    runtime.block_on(tui::run(&config))
}

/// Initialize tracing with a file writer.
fn init_file_logging(path: &std::path::Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .map_err(|e| StylusError::io(format!("Failed to create log file {}", path.display()), e))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stylus=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
