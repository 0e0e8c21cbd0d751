//! Per-symbol state: last bid/ask and running spread high/low.
//!
//! Records are created on the first event for a symbol and live for the whole session.
//! The store is a plain owned value; whoever owns it (normally the `Dispatcher`) is the
//! only writer.

use std::collections::HashMap;

use strum_macros::Display;

use crate::pip::Spread;

/// Movement of a price against the previously stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Strictly greater than the previous value.
    Up,
    /// Strictly lower than the previous value.
    Down,
    /// Equal, first observation, or not comparable.
    Flat,
}

impl Direction {
    /// Classifies `current` against `previous`.
    pub fn between(previous: Option<f64>, current: Option<f64>) -> Direction {
        match (previous, current) {
            (Some(prev), Some(cur)) if cur > prev => Direction::Up,
            (Some(prev), Some(cur)) if cur < prev => Direction::Down,
            _ => Direction::Flat,
        }
    }
}

/// Running spread extremes, in pips. `low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadStats {
    /// Widest spread observed.
    pub high: f64,
    /// Tightest spread observed.
    pub low: f64,
}

impl SpreadStats {
    fn seed(pips: f64) -> Self {
        SpreadStats {
            high: pips,
            low: pips,
        }
    }

    fn observe(&mut self, pips: f64) {
        self.high = self.high.max(pips);
        self.low = self.low.min(pips);
    }
}

/// State kept for one symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolRecord {
    /// Last well-formed bid.
    pub last_bid: Option<f64>,
    /// Last well-formed ask.
    pub last_ask: Option<f64>,
    /// Spread extremes; `None` until the first well-formed bid/ask pair.
    pub spread_stats: Option<SpreadStats>,
}

/// Snapshot returned by [`SymbolStore::apply_update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateOutcome {
    /// Bid movement.
    pub bid_direction: Direction,
    /// Ask movement.
    pub ask_direction: Direction,
    /// Spread of this update, `None` if bid or ask was malformed.
    pub spread: Option<Spread>,
    /// Spread extremes after this update.
    pub spread_stats: Option<SpreadStats>,
    /// Set when this update could not refresh the spread statistics.
    pub stale: bool,
}

/// Symbol name to record mapping.
#[derive(Debug, Default)]
pub struct SymbolStore {
    records: HashMap<String, SymbolRecord>,
    order: Vec<String>,
}

impl SymbolStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one bid/ask observation into the symbol's record.
    ///
    /// Directions are computed against the stored values before they are overwritten.
    /// A malformed side (`None`) keeps its previous stored value and leaves the spread
    /// statistics untouched.
    pub fn apply_update(
        &mut self,
        symbol: &str,
        bid: Option<f64>,
        ask: Option<f64>,
    ) -> UpdateOutcome {
        if !self.records.contains_key(symbol) {
            self.order.push(symbol.to_string());
        }
        let record = self.records.entry(symbol.to_string()).or_default();

        let bid_direction = Direction::between(record.last_bid, bid);
        let ask_direction = Direction::between(record.last_ask, ask);

        let spread = match (bid, ask) {
            (Some(bid), Some(ask)) => Spread::compute(bid, ask),
            _ => None,
        };
        if let Some(spread) = spread {
            match record.spread_stats.as_mut() {
                Some(stats) => stats.observe(spread.pips),
                None => record.spread_stats = Some(SpreadStats::seed(spread.pips)),
            }
        }

        if bid.is_some() {
            record.last_bid = bid;
        }
        if ask.is_some() {
            record.last_ask = ask;
        }

        UpdateOutcome {
            bid_direction,
            ask_direction,
            spread,
            spread_stats: record.spread_stats,
            stale: spread.is_none(),
        }
    }

    /// Record for `symbol`, if any event was seen for it.
    pub fn get(&self, symbol: &str) -> Option<&SymbolRecord> {
        self.records.get(symbol)
    }

    /// Symbols in order of first appearance.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of tracked symbols.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no event has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
