//! Routes quote events to the symbol store and the chart buffer.
//!
//! The `Dispatcher` owns all mutable session state (symbol records, selection, chart
//! buffer) and is meant to be driven from a single thread. Every call returns a
//! description of what changed so a renderer can redraw without reaching into the
//! state itself.
//!
//! Per event:
//! - the symbol's record is always updated and a `TableRow` produced;
//! - the chart is only touched when the event is for the selected symbol. If the
//!   selected symbol differs from the one the chart was last fed with, the buffer is
//!   reset before the new point is appended.
//!
//! Nothing in here fails per event: malformed prices degrade the row (`stale`) and
//! skip the chart point.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::MonitorError;
use crate::format::{FormattedPrice, format_price};
use crate::quote::{QuoteEvent, RawQuote};
use crate::selection::{Metric, SeriesMeta, Selection};
use crate::series::{SeriesBuffer, SeriesPoint};
use crate::store::{Direction, SymbolStore};
use crate::time::{Clock, DisplayZone, SystemClock, format_timestamp, normalize_ts};

/// Table row for one symbol after an update.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Instrument symbol.
    pub symbol: String,
    /// Segmented bid.
    pub bid: FormattedPrice,
    /// Segmented ask.
    pub ask: FormattedPrice,
    /// Bid movement against the previous update.
    pub bid_direction: Direction,
    /// Ask movement against the previous update.
    pub ask_direction: Direction,
    /// Spread in pips, `None` on malformed prices.
    pub spread_pips: Option<f64>,
    /// Spread as a percentage of bid, `None` on malformed prices or zero bid.
    pub spread_percent: Option<f64>,
    /// Widest spread seen for the symbol.
    pub spread_high: Option<f64>,
    /// Tightest spread seen for the symbol.
    pub spread_low: Option<f64>,
    /// Event time as `HH:MM:SS.mmm`.
    pub time: String,
    /// This update did not refresh the spread statistics.
    pub stale: bool,
}

/// Change applied to the chart buffer by one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDelta {
    /// The buffer was cleared before appending.
    pub reset: bool,
    /// Appended point; `None` when the metric value was unavailable.
    pub appended: Option<SeriesPoint>,
    /// Points evicted by the horizon after appending.
    pub evicted: usize,
}

/// Everything one event changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Refreshed table row.
    pub row: TableRow,
    /// Chart change, present only for the selected symbol.
    pub chart: Option<ChartDelta>,
}

/// Current chart contents and rendering hints.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    /// Title, e.g. `Bid Price – GBPUSD`.
    pub title: String,
    /// Series name and colour.
    pub meta: SeriesMeta,
    /// Retained points, oldest first.
    pub points: Vec<SeriesPoint>,
}

/// Single-owner session state and event router.
pub struct Dispatcher<C: Clock = SystemClock> {
    store: SymbolStore,
    rows: HashMap<String, TableRow>,
    selection: Selection,
    buffer: SeriesBuffer,
    charted_symbol: Option<String>,
    zone: DisplayZone,
    clock: C,
}

impl Dispatcher<SystemClock> {
    /// Creates a dispatcher driven by the wall clock.
    pub fn new(selection: Selection, zone: DisplayZone) -> Self {
        Self::with_clock(selection, zone, SystemClock)
    }
}

impl<C: Clock> Dispatcher<C> {
    /// Creates a dispatcher with an explicit clock.
    pub fn with_clock(selection: Selection, zone: DisplayZone, clock: C) -> Self {
        let buffer = SeriesBuffer::new(selection.retention_secs);
        Self {
            store: SymbolStore::new(),
            rows: HashMap::new(),
            selection,
            buffer,
            charted_symbol: None,
            zone,
            clock,
        }
    }

    /// Resolves a wire quote (missing timestamps fall back to the clock) and dispatches it.
    pub fn on_raw(&mut self, raw: &RawQuote) -> Update {
        let event = raw.resolve(self.clock.now_ms());
        self.on_event(&event)
    }

    /// Processes one quote event.
    pub fn on_event(&mut self, event: &QuoteEvent) -> Update {
        let row = self.update_row(event);
        let chart = (event.symbol == self.selection.symbol).then(|| self.update_chart(event, &row));
        Update { row, chart }
    }

    /// Feeds the connection-start snapshot through the table path, then clears the chart.
    pub fn apply_snapshot<'a, I>(&mut self, quotes: I) -> Vec<TableRow>
    where
        I: IntoIterator<Item = &'a RawQuote>,
    {
        let now_ms = self.clock.now_ms();
        let rows = quotes
            .into_iter()
            .map(|raw| self.update_row(&raw.resolve(now_ms)))
            .collect();
        self.reset_chart();
        rows
    }

    /// Selects the chart symbol and clears the chart.
    pub fn select_symbol(&mut self, symbol: &str) {
        debug!("Chart symbol: {} -> {}", self.selection.symbol, symbol);
        self.selection.symbol = symbol.to_string();
        self.reset_chart();
    }

    /// Selects the chart metric and clears the chart.
    pub fn select_metric(&mut self, metric: Metric) {
        debug!("Chart metric: {} -> {}", self.selection.metric, metric);
        self.selection.metric = metric;
        self.reset_chart();
    }

    /// Selects the chart metric by name. Unknown names leave the selection untouched.
    pub fn select_metric_name(&mut self, name: &str) -> Result<(), MonitorError> {
        let metric = Metric::parse(name)?;
        self.select_metric(metric);
        Ok(())
    }

    /// Changes the retention horizon, trimming the buffer against its newest point.
    ///
    /// Returns the number of evicted points.
    pub fn set_retention(&mut self, retention_secs: u64) -> Result<usize, MonitorError> {
        if retention_secs == 0 {
            return Err(MonitorError::InvalidRetention(retention_secs));
        }
        self.selection.retention_secs = retention_secs;
        Ok(self.buffer.set_retention(retention_secs))
    }

    /// Clears the chart buffer.
    pub fn reset_chart(&mut self) {
        self.buffer.reset();
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current chart contents.
    pub fn chart(&self) -> ChartView {
        ChartView {
            title: self.selection.title(),
            meta: self.selection.metric.meta(),
            points: self.buffer.to_vec(),
        }
    }

    /// Chart buffer.
    pub fn buffer(&self) -> &SeriesBuffer {
        &self.buffer
    }

    /// Symbol records.
    pub fn store(&self) -> &SymbolStore {
        &self.store
    }

    /// Latest row per symbol, in order of first appearance.
    pub fn rows(&self) -> Vec<&TableRow> {
        self.store
            .symbols()
            .filter_map(|symbol| self.rows.get(symbol))
            .collect()
    }

    fn update_row(&mut self, event: &QuoteEvent) -> TableRow {
        let outcome = self.store.apply_update(&event.symbol, event.bid, event.ask);
        if outcome.stale {
            warn!(
                "Malformed quote for {}: bid={:?} ask={:?}; spread stats kept",
                event.symbol, event.bid, event.ask
            );
        }

        let row = TableRow {
            symbol: event.symbol.clone(),
            bid: format_price(event.bid),
            ask: format_price(event.ask),
            bid_direction: outcome.bid_direction,
            ask_direction: outcome.ask_direction,
            spread_pips: outcome.spread.map(|s| s.pips),
            spread_percent: outcome.spread.and_then(|s| s.percent),
            spread_high: outcome.spread_stats.map(|s| s.high),
            spread_low: outcome.spread_stats.map(|s| s.low),
            time: format_timestamp(event.ts, self.zone),
            stale: outcome.stale,
        };
        self.rows.insert(event.symbol.clone(), row.clone());
        row
    }

    fn update_chart(&mut self, event: &QuoteEvent, row: &TableRow) -> ChartDelta {
        let reset = self.charted_symbol.as_deref() != Some(self.selection.symbol.as_str());
        if reset {
            self.buffer.reset();
            self.charted_symbol = Some(self.selection.symbol.clone());
        }

        let value = self
            .selection
            .metric
            .value(event.bid, event.ask, row.spread_pips);
        let Some(value) = value else {
            debug!(
                "No {} value for {} at {}; chart point skipped",
                self.selection.metric, event.symbol, event.ts
            );
            return ChartDelta {
                reset,
                appended: None,
                evicted: 0,
            };
        };

        let ts_ms = normalize_ts(event.ts);
        let evicted = self.buffer.append(ts_ms, value);
        ChartDelta {
            reset,
            appended: Some(SeriesPoint { ts_ms, value }),
            evicted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;

    fn dispatcher() -> Dispatcher<ManualClock> {
        Dispatcher::with_clock(
            Selection::default(),
            DisplayZone::Utc,
            ManualClock::new(1_700_000_000_000),
        )
    }

    #[test]
    fn other_symbols_update_rows_only() {
        let mut d = dispatcher();
        let update = d.on_event(&QuoteEvent::new("GBPUSD", 1.27, 1.2702, 1_700_000_000));

        assert_eq!(update.row.symbol, "GBPUSD");
        assert_eq!(update.chart, None);
        assert!(d.buffer().is_empty());
    }

    #[test]
    fn first_selected_event_resets_then_appends() {
        let mut d = dispatcher();
        let update = d.on_event(&QuoteEvent::new("EURUSD", 1.1, 1.1002, 1_700_000_000));
        let chart = update.chart.unwrap();

        assert!(chart.reset);
        assert_eq!(
            chart.appended,
            Some(SeriesPoint {
                ts_ms: 1_700_000_000_000,
                value: 2.0
            })
        );

        let second = d.on_event(&QuoteEvent::new("EURUSD", 1.1, 1.1003, 1_700_000_001));
        assert!(!second.chart.unwrap().reset);
        assert_eq!(d.buffer().len(), 2);
    }

    #[test]
    fn missing_timestamp_uses_clock() {
        let mut d = dispatcher();
        let raw: RawQuote =
            serde_json::from_str(r#"{"symbol":"EURUSD","bid":1.1,"ask":1.1001}"#).unwrap();
        let update = d.on_raw(&raw);

        assert_eq!(update.chart.unwrap().appended.unwrap().ts_ms, 1_700_000_000_000);
        assert_eq!(update.row.time, "22:13:20.000");
    }

    #[test]
    fn unknown_metric_name_keeps_selection() {
        let mut d = dispatcher();
        d.on_event(&QuoteEvent::new("EURUSD", 1.1, 1.1002, 1_700_000_000));

        assert!(d.select_metric_name("volume").is_err());
        assert_eq!(d.selection().metric, Metric::Spread);
        assert_eq!(d.buffer().len(), 1);
    }

    #[test]
    fn zero_retention_is_rejected() {
        let mut d = dispatcher();
        assert!(matches!(
            d.set_retention(0),
            Err(MonitorError::InvalidRetention(0))
        ));
        assert_eq!(d.selection().retention_secs, 60);
    }
}
