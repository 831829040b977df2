//! geocache - Resolve place names to coordinates through a persistent cache
//!
//! geocache provides:
//! - A lookup cache backed by an atomically rewritten JSON snapshot
//! - Merge-on-close so concurrent runs do not drop each other's entries
//! - Nominatim and offline gazetteer geocoding providers
//! - Map marker computation for per-location datasets
//! - Unified output format (jsonl/json/md/raw)

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cache;
mod cli;
mod commands;
mod core;
mod error;
mod geocode;
mod plot;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    cli::run(cli)
}

/// Log to stderr; `RUST_LOG` wins over -v/-q.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "geocache=debug"
    } else if quiet {
        "geocache=warn"
    } else {
        "geocache=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
