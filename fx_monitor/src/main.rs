//! Spread monitor — consumes a quote feed and keeps a live spread table and chart series.
//!
//! The binary wires together three building blocks:
//!
//! - `FeedReader` — reads JSON lines from a file or stdin on a background thread and
//!   forwards decoded `FeedMessage`s over a `crossbeam_channel`.
//! - `Monitor` — owns the `Dispatcher` (symbol records, chart selection, chart buffer)
//!   and applies each message, reporting rows and chart changes.
//! - `render` — turns those reports into log lines and the final table.
//!
//! Concurrency and shutdown:
//! - All state lives on the main thread; the reader thread only decodes lines, so the
//!   channel acts as the single-writer queue and events are applied in arrival order.
//! - Crossbeam `select!` multiplexes feed messages and the Ctrl+C signal.
//! - The loop ends on end of input, Ctrl+C, or a closed reader channel, then prints the
//!   latest row of every symbol to stdout.
//!
//! Usage example (CLI):
//! ```bash
//! fx_feed | fx_monitor --symbol USDJPY --metric bid --retention 120
//! fx_monitor --input ./quotes.jsonl --pairs ./pairs.txt
//! ```
#![warn(missing_docs)]
mod app;
mod args;
mod reader;
mod render;

use crate::app::{Monitor, Output};
use crate::args::Args;
use crate::reader::{FeedReader, ReaderEvent};
use clap::Parser;
use crossbeam_channel::{Receiver, bounded, select, unbounded};
use fx_common::MonitorError;
use fx_common::Result;
use fx_common::dispatcher::Dispatcher;
use fx_common::paths::{cli_path, load_pairs};
use fx_common::selection::{Metric, Selection};
use fx_common::time::{Clock, DisplayZone};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::thread;

fn main() -> Result<(), MonitorError> {
    init_logger();
    let args = Args::parse();

    let metric = Metric::parse(&args.metric)?;
    if args.retention == 0 {
        return Err(MonitorError::InvalidRetention(args.retention));
    }
    let zone = if args.local_time {
        DisplayZone::Local
    } else {
        DisplayZone::Utc
    };
    let selection = Selection::new(args.symbol.trim(), metric, args.retention);
    info!("Chart: {} over {}s", selection.title(), selection.retention_secs);

    let symbols = match args.pairs.as_deref() {
        Some(raw) => {
            let pairs = load_pairs(raw)?;
            info!("Pairs: {:?}", pairs);
            Some(pairs.iter().map(|p| p.to_string()).collect::<HashSet<String>>())
        }
        None => None,
    };

    let reader = match args.input.as_deref() {
        Some(raw) => FeedReader::open(&cli_path(raw))?,
        None => FeedReader::stdin(),
    };

    let (stop_tx, stop_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down monitor...");
        let _ = stop_tx.try_send(());
    })
    .map_err(|e| MonitorError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    let (feed_tx, feed_rx) = unbounded::<ReaderEvent>();
    thread::spawn(move || {
        if let Err(e) = reader.read_loop_with_channel(feed_tx) {
            error!("Feed reader failed: {}", e);
        }
    });

    let mut monitor = Monitor::new(Dispatcher::new(selection, zone), symbols);
    let outcome = run_loop(&mut monitor, feed_rx, stop_rx, zone);
    if let Err(e) = &outcome {
        error!("Monitor stopped early: {}", e);
    }

    let dispatcher = monitor.dispatcher();
    info!(
        "Tracked {} symbols; chart holds {} points",
        dispatcher.store().len(),
        dispatcher.buffer().len()
    );
    print!("{}", render::table(dispatcher.rows()));
    outcome
}

/// Applies feed messages until end of input or a stop signal.
///
/// A feed channel that closes without `ReaderEvent::End` means the reader thread died
/// and is reported as `MonitorError::ChannelRecv`.
fn run_loop<C: Clock>(
    monitor: &mut Monitor<C>,
    feed_rx: Receiver<ReaderEvent>,
    stop_rx: Receiver<()>,
    zone: DisplayZone,
) -> Result<(), MonitorError> {
    loop {
        select! {
            recv(feed_rx) -> event => match event {
                Ok(ReaderEvent::Message(message)) => {
                    for output in monitor.handle(message) {
                        render_output(monitor, &output, zone);
                    }
                }
                Ok(ReaderEvent::End) => return Ok(()),
                Err(e) => return Err(MonitorError::ChannelRecv(e.to_string())),
            },
            recv(stop_rx) -> _ => return Ok(()),
        }
    }
}

fn render_output<C: Clock>(monitor: &Monitor<C>, output: &Output, zone: DisplayZone) {
    match output {
        Output::Row(row) => info!("{}", render::row_line(row)),
        Output::Chart(delta) => {
            debug!("{}", render::chart_line(&monitor.dispatcher().chart(), delta, zone))
        }
        Output::ChartCleared(title) => info!("Chart cleared: {}", title),
        Output::Rejected(reason) => warn!("Command rejected: {}", reason),
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_common::FeedMessage;
    use fx_common::time::ManualClock;

    fn monitor() -> Monitor<ManualClock> {
        let dispatcher = Dispatcher::with_clock(
            Selection::default(),
            DisplayZone::Utc,
            ManualClock::new(1_700_000_000_000),
        );
        Monitor::new(dispatcher, None)
    }

    fn quote() -> ReaderEvent {
        let line = r#"{"symbol":"EURUSD","bid":1.1,"ask":1.1002}"#;
        ReaderEvent::Message(FeedMessage::parse_line(line).unwrap().unwrap())
    }

    #[test]
    fn stops_cleanly_at_end_of_input() {
        let (feed_tx, feed_rx) = unbounded();
        let (_stop_tx, stop_rx) = bounded(1);
        feed_tx.send(quote()).unwrap();
        feed_tx.send(ReaderEvent::End).unwrap();

        let mut m = monitor();
        assert!(run_loop(&mut m, feed_rx, stop_rx, DisplayZone::Utc).is_ok());
        assert_eq!(m.dispatcher().store().len(), 1);
    }

    #[test]
    fn reader_dying_without_end_is_a_receive_error() {
        let (feed_tx, feed_rx) = unbounded();
        let (_stop_tx, stop_rx) = bounded(1);
        feed_tx.send(quote()).unwrap();
        drop(feed_tx);

        let mut m = monitor();
        assert!(matches!(
            run_loop(&mut m, feed_rx, stop_rx, DisplayZone::Utc),
            Err(MonitorError::ChannelRecv(_))
        ));
        assert_eq!(m.dispatcher().buffer().len(), 1);
    }

    #[test]
    fn stop_signal_ends_the_loop() {
        let (_feed_tx, feed_rx) = unbounded::<ReaderEvent>();
        let (stop_tx, stop_rx) = bounded(1);
        stop_tx.send(()).unwrap();

        let mut m = monitor();
        assert!(run_loop(&mut m, feed_rx, stop_rx, DisplayZone::Utc).is_ok());
    }
}
