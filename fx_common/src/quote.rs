//! Quote events as they arrive on the feed and after numeric resolution.
//!
//! A feed line carries prices either as JSON numbers or as numeric strings, and the
//! timestamp may be missing altogether. `RawQuote` keeps the wire shape; `QuoteEvent`
//! is what the engine consumes, with prices resolved to `Option<f64>` (`None` for
//! malformed input) and the timestamp always present.

use serde::{Deserialize, Serialize};

/// A numeric field as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    /// Plain JSON number.
    Number(f64),
    /// Number sent as a string, e.g. `"1.08520"`.
    Text(String),
    /// Anything else (bool, object, array). Always malformed.
    Other(serde_json::Value),
}

impl NumberLike {
    /// Finite numeric value, or `None` when the field is not a number.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumberLike::Number(n) => *n,
            NumberLike::Text(s) => s.trim().parse::<f64>().ok()?,
            NumberLike::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for NumberLike {
    fn from(value: f64) -> Self {
        NumberLike::Number(value)
    }
}

/// Quote payload exactly as received from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    /// Instrument symbol, e.g. `EURUSD`.
    pub symbol: String,
    /// Bid price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid: Option<NumberLike>,
    /// Ask price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask: Option<NumberLike>,
    /// Unix timestamp, seconds or milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<NumberLike>,
}

impl RawQuote {
    /// Resolves wire fields into a `QuoteEvent`.
    ///
    /// A missing, non-numeric or zero `ts` is replaced with `now_ms`.
    pub fn resolve(&self, now_ms: i64) -> QuoteEvent {
        let ts = self
            .ts
            .as_ref()
            .and_then(NumberLike::as_f64)
            .map(|t| t as i64)
            .filter(|t| *t != 0)
            .unwrap_or(now_ms);

        QuoteEvent {
            symbol: self.symbol.clone(),
            bid: self.bid.as_ref().and_then(NumberLike::as_f64),
            ask: self.ask.as_ref().and_then(NumberLike::as_f64),
            ts,
        }
    }
}

/// A single bid/ask update for one symbol, immutable once received.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteEvent {
    /// Instrument symbol.
    pub symbol: String,
    /// Bid price, `None` when the feed sent something non-numeric.
    pub bid: Option<f64>,
    /// Ask price, `None` when the feed sent something non-numeric.
    pub ask: Option<f64>,
    /// Unix timestamp in seconds or milliseconds (see `time::normalize_ts`).
    pub ts: i64,
}

impl QuoteEvent {
    /// Creates a well-formed event.
    pub fn new(symbol: &str, bid: f64, ask: f64, ts: i64) -> Self {
        QuoteEvent {
            symbol: String::from(symbol),
            bid: Some(bid),
            ask: Some(ask),
            ts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_numbers_and_numeric_strings() {
        let raw: RawQuote = serde_json::from_str(
            r#"{"symbol":"EURUSD","bid":"1.08520","ask":1.0853,"ts":"1700000000123","mid":1.0}"#,
        )
        .unwrap();
        let event = raw.resolve(0);
        assert_eq!(event.bid, Some(1.0852));
        assert_eq!(event.ask, Some(1.0853));
        assert_eq!(event.ts, 1_700_000_000_123);
    }

    #[test]
    fn malformed_prices_resolve_to_none() {
        let raw: RawQuote =
            serde_json::from_str(r#"{"symbol":"EURUSD","bid":"n/a","ask":true}"#).unwrap();
        let event = raw.resolve(42);
        assert_eq!(event.bid, None);
        assert_eq!(event.ask, None);
        assert_eq!(event.ts, 42);
    }

    #[test]
    fn zero_timestamp_falls_back_to_now() {
        let raw: RawQuote =
            serde_json::from_str(r#"{"symbol":"GBPUSD","bid":1.27,"ask":1.2702,"ts":0}"#).unwrap();
        assert_eq!(raw.resolve(1_700_000_000_000).ts, 1_700_000_000_000);
    }
}
