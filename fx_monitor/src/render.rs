//! Text rendering of table rows and chart changes.

use fx_common::dispatcher::{ChartDelta, ChartView, TableRow};
use fx_common::format::FormattedPrice;
use fx_common::pip::display_percent;
use fx_common::store::Direction;
use fx_common::time::{DisplayZone, format_timestamp};

fn arrow(direction: Direction) -> char {
    match direction {
        Direction::Up => '▲',
        Direction::Down => '▼',
        Direction::Flat => ' ',
    }
}

fn price(formatted: &FormattedPrice, direction: Direction) -> String {
    format!("{}{}", formatted, arrow(direction))
}

fn pips(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |v| format!("{:.2}", v))
}

/// One table row, e.g. `EURUSD  1.08[52]1▲  1.08[53]1   1.00  0.0092%  hi 1.20  lo 0.80  22:13:20.045`.
pub fn row_line(row: &TableRow) -> String {
    let mut line = format!(
        "{:<9} {:>12} {:>12} {:>8} {:>9}  hi {:<7} lo {:<7} {}",
        row.symbol,
        price(&row.bid, row.bid_direction),
        price(&row.ask, row.ask_direction),
        pips(row.spread_pips),
        display_percent(row.spread_percent),
        pips(row.spread_high),
        pips(row.spread_low),
        row.time,
    );
    if row.stale {
        line.push_str("  (stale)");
    }
    line
}

/// One chart change against the current chart view.
pub fn chart_line(view: &ChartView, delta: &ChartDelta, zone: DisplayZone) -> String {
    let point = match delta.appended {
        Some(p) => format!("{} @ {}", p.value, format_timestamp(p.ts_ms, zone)),
        None => String::from("no value"),
    };
    format!(
        "{} [{}]: {}{}; {} points, {} evicted",
        view.title,
        view.meta.color,
        if delta.reset { "reset, " } else { "" },
        point,
        view.points.len(),
        delta.evicted,
    )
}

/// Full table with a header line.
pub fn table<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = &'a TableRow>,
{
    let mut out = format!(
        "{:<9} {:>12} {:>12} {:>8} {:>9}  {:<10} {:<10} {}\n",
        "SYMBOL", "BID", "ASK", "PIPS", "SPREAD%", "HIGH", "LOW", "TIME"
    );
    for row in rows {
        out.push_str(&row_line(row));
        out.push('\n');
    }
    out
}
