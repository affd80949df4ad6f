//! Binary crate for the `cityweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Drawing session changes published by the search controller

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

/// Filter used when `RUST_LOG` is unset. Failures the user already sees as a
/// message are logged at `warn`, so the default stays quieter than that.
const DEFAULT_LOG_FILTER: &str = "error";

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr; `RUST_LOG=cityweather_core=debug` shows the
    // debounce and stale-result bookkeeping.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
