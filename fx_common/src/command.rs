//! Feed line protocol shared by the producer and the monitor.
//!
//! Every line is one JSON object: either a bare quote (`{"symbol": ..., "bid": ...}`)
//! or a control command tagged by a `command` field. Control commands carry the
//! initial snapshot and the chart selection changes.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::MonitorError;
use crate::quote::RawQuote;

/// Handshake line some feeds send before the first quote.
pub const CONNECTED: &str = "connected";

/// Control command payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum Command {
    /// Latest known quote per symbol, sent once at connection start.
    Snapshot(BTreeMap<String, RawQuote>),
    /// Switch the chart to another symbol.
    SelectSymbol(String),
    /// Switch the charted metric (`spread`, `bid` or `ask`).
    SelectMetric(String),
    /// Change the retention horizon, in seconds.
    SetRetention(u64),
    /// Clear the chart buffer.
    Reset,
}

/// One decoded feed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedMessage {
    /// Control command.
    Command(Command),
    /// Quote update.
    Quote(RawQuote),
}

impl FeedMessage {
    /// Decodes one line. Blank lines and the `connected` handshake yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<FeedMessage>, MonitorError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(CONNECTED) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(trimmed)?))
    }

    /// Encodes the message as a single JSON line (without the trailing newline).
    pub fn to_json_line(&self) -> Result<String, MonitorError> {
        Ok(serde_json::to_string(self)?)
    }
}
