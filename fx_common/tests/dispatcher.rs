use fx_common::dispatcher::Dispatcher;
use fx_common::quote::{QuoteEvent, RawQuote};
use fx_common::selection::{Metric, Selection};
use fx_common::series::BufferState;
use fx_common::store::Direction;
use fx_common::time::{DisplayZone, ManualClock};

fn session(symbol: &str, metric: Metric, retention_secs: u64) -> Dispatcher<ManualClock> {
    Dispatcher::with_clock(
        Selection::new(symbol, metric, retention_secs),
        DisplayZone::Utc,
        ManualClock::new(1_700_000_000_000),
    )
}

fn raw(line: &str) -> RawQuote {
    serde_json::from_str(line).unwrap()
}

#[test]
fn spread_row_for_eurusd_quote() {
    let mut d = session("EURUSD", Metric::Spread, 60);
    let row = d.on_event(&QuoteEvent::new("EURUSD", 1.23456, 1.23556, 1_700_000_000)).row;

    assert_eq!(row.spread_pips, Some(10.0));
    assert!((row.spread_percent.unwrap() - 0.0810).abs() < 1e-9);
    assert_eq!(row.spread_high, Some(10.0));
    assert_eq!(row.spread_low, Some(10.0));
    assert_eq!(row.bid.joined(), "1.23456");
    assert_eq!(row.bid.tail, "45");
    assert!(!row.stale);
}

#[test]
fn rising_bid_is_flagged_up() {
    let mut d = session("EURUSD", Metric::Spread, 60);
    let first = d.on_event(&QuoteEvent::new("EURUSD", 1.1000, 1.1002, 1_700_000_000));
    let second = d.on_event(&QuoteEvent::new("EURUSD", 1.1050, 1.1052, 1_700_000_001));

    assert_eq!(first.row.bid_direction, Direction::Flat);
    assert_eq!(second.row.bid_direction, Direction::Up);
    assert_eq!(second.row.ask_direction, Direction::Up);
}

#[test]
fn chart_keeps_only_the_retention_window() {
    let mut d = session("EURUSD", Metric::Spread, 60);
    for t in (0..=70).step_by(10) {
        d.on_event(&QuoteEvent::new("EURUSD", 1.1, 1.1002, t));
    }

    let chart = d.chart();
    let seconds: Vec<i64> = chart.points.iter().map(|p| p.ts_ms / 1000).collect();
    assert_eq!(seconds, vec![10, 20, 30, 40, 50, 60, 70]);
    assert!(chart.points.iter().all(|p| p.value == 2.0));
    assert_eq!(chart.title, "Spread (pips) – EURUSD");
    assert_eq!(chart.meta.color, "#3a86ff");
}

#[test]
fn switching_symbol_discards_buffered_points() {
    let mut d = session("EURUSD", Metric::Bid, 60);
    d.on_event(&QuoteEvent::new("EURUSD", 1.1, 1.1002, 1_700_000_000));
    d.on_event(&QuoteEvent::new("GBPUSD", 1.27, 1.2702, 1_700_000_001));
    assert_eq!(d.buffer().len(), 1);

    d.select_symbol("GBPUSD");
    assert_eq!(d.buffer().state(), BufferState::Empty);

    let update = d.on_event(&QuoteEvent::new("EURUSD", 1.1001, 1.1003, 1_700_000_002));
    assert_eq!(update.chart, None);
    assert!(d.buffer().is_empty());

    let update = d.on_event(&QuoteEvent::new("GBPUSD", 1.2701, 1.2703, 1_700_000_003));
    let delta = update.chart.unwrap();
    assert!(delta.reset);
    assert_eq!(delta.appended.unwrap().value, 1.2701);
    assert_eq!(d.chart().title, "Bid Price – GBPUSD");
}

#[test]
fn switching_metric_discards_buffered_points() {
    let mut d = session("EURUSD", Metric::Spread, 60);
    d.on_event(&QuoteEvent::new("EURUSD", 1.1, 1.1002, 1_700_000_000));
    d.on_event(&QuoteEvent::new("EURUSD", 1.1, 1.1003, 1_700_000_001));

    d.select_metric(Metric::Ask);
    assert!(d.buffer().is_empty());

    let update = d.on_event(&QuoteEvent::new("EURUSD", 1.1, 1.1004, 1_700_000_002));
    let delta = update.chart.unwrap();
    assert!(!delta.reset);
    assert_eq!(delta.appended.unwrap().value, 1.1004);
    assert_eq!(d.buffer().len(), 1);
}

#[test]
fn reset_twice_matches_reset_once() {
    let mut d = session("EURUSD", Metric::Spread, 60);
    d.on_event(&QuoteEvent::new("EURUSD", 1.1, 1.1002, 1_700_000_000));

    d.reset_chart();
    let once = d.chart();
    d.reset_chart();
    assert_eq!(d.chart(), once);
    assert!(once.points.is_empty());
}

#[test]
fn snapshot_fills_table_without_chart_points() {
    let mut d = session("EURUSD", Metric::Spread, 60);
    let quotes = vec![
        raw(r#"{"symbol":"EURUSD","bid":1.0852,"ask":1.0853,"ts":1700000000000}"#),
        raw(r#"{"symbol":"USDJPY","bid":150.21,"ask":150.218,"ts":1700000000000}"#),
    ];
    let rows = d.apply_snapshot(&quotes);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].spread_pips, Some(0.8));
    assert!(d.buffer().is_empty());
    let symbols: Vec<&str> = d.rows().iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["EURUSD", "USDJPY"]);

    let update = d.on_raw(&raw(r#"{"symbol":"EURUSD","bid":1.0851,"ask":1.0853}"#));
    assert_eq!(update.row.bid_direction, Direction::Down);
    assert_eq!(d.buffer().len(), 1);
}

#[test]
fn malformed_quote_is_contained_to_its_event() {
    let mut d = session("EURUSD", Metric::Spread, 60);
    d.on_event(&QuoteEvent::new("EURUSD", 1.1, 1.1002, 1_700_000_000));

    let bad = d.on_raw(&raw(r#"{"symbol":"EURUSD","bid":"oops","ask":1.1003,"ts":1700000001}"#));
    assert!(bad.row.stale);
    assert_eq!(bad.row.bid.joined(), "0.00");
    assert_eq!(bad.row.spread_pips, None);
    assert_eq!(bad.row.spread_high, Some(2.0));
    let delta = bad.chart.unwrap();
    assert_eq!(delta.appended, None);
    assert_eq!(d.buffer().len(), 1);

    let good = d.on_event(&QuoteEvent::new("EURUSD", 1.1, 1.1005, 1_700_000_002));
    assert!(!good.row.stale);
    assert_eq!(good.row.spread_high, Some(5.0));
    assert_eq!(good.row.spread_low, Some(2.0));
    assert_eq!(d.buffer().len(), 2);
}

#[test]
fn zero_bid_row_has_no_percentage() {
    let mut d = session("EURUSD", Metric::Spread, 60);
    let row = d.on_event(&QuoteEvent::new("XXXUSD", 0.0, 0.0002, 1_700_000_000)).row;

    assert_eq!(row.spread_percent, None);
    assert_eq!(row.spread_pips, Some(2.0));
    assert!(!row.stale);
}

#[test]
fn shrinking_retention_trims_chart() {
    let mut d = session("EURUSD", Metric::Spread, 60);
    for t in 0..6 {
        d.on_event(&QuoteEvent::new("EURUSD", 1.1, 1.1002, 1_700_000_000 + t * 10));
    }
    assert_eq!(d.set_retention(20).unwrap(), 3);
    assert_eq!(d.buffer().len(), 3);
    assert_eq!(d.selection().retention_secs, 20);
}
