//! Command-line arguments for the spread monitor.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Feed file with one JSON message per line. Reads stdin when omitted.
    #[clap(long)]
    pub input: Option<String>,

    /// Symbol shown on the chart.
    #[clap(long, default_value = "EURUSD")]
    pub symbol: String,

    /// Charted metric: spread, bid or ask.
    #[clap(long, default_value = "spread")]
    pub metric: String,

    /// Chart retention horizon, in seconds.
    #[clap(long, default_value_t = 60)]
    pub retention: u64,

    /// Path to a text file with the pairs to process; other symbols are ignored.
    /// Pairs may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub pairs: Option<String>,

    /// Render times in the local time zone instead of UTC.
    #[clap(long)]
    pub local_time: bool,
}
