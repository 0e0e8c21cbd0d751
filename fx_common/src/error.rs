//! Error types shared between the feed and the monitor.
//!
//! Only setup and plumbing failures surface as `MonitorError`. Problems with a single
//! quote (non-numeric prices, zero bid, missing timestamp) never become errors; they
//! degrade the produced row instead so that the next event is still processed.
use std::io;

use thiserror::Error;

/// Unified error type shared by the workspace crates.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// I/O error originating from files, stdin or stdout.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Error while parsing a pairs file into `Pair` values.
    #[error("Parse pairs file error: {0}")]
    ParsePairsFile(String),

    /// A chart metric name that is not one of `spread`, `bid` or `ask`.
    #[error("Unknown chart metric: {0}")]
    UnknownMetric(String),

    /// A retention horizon of zero seconds.
    #[error("Invalid retention: {0} seconds")]
    InvalidRetention(u64),

    /// Channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),
}
