//! Command-line arguments for the quote feed.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use fx_common::pairs::Pair;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Pair to stream; repeat for several. Takes precedence over `--pairs`.
    #[clap(long, value_enum, ignore_case = true)]
    pub pair: Vec<Pair>,

    /// Path to a text file with pairs to stream.
    /// Pairs may be separated by commas, spaces, or new lines. Defaults to every known pair.
    #[clap(long)]
    pub pairs: Option<String>,

    /// Delay between ticks, in milliseconds.
    #[clap(long, default_value_t = 500)]
    pub interval_ms: u64,

    /// Stop after this many ticks (one tick updates every pair).
    #[clap(long)]
    pub count: Option<u64>,

    /// Do not emit the initial snapshot line.
    #[clap(long)]
    pub no_snapshot: bool,
}
