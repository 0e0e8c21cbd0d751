//! Quote feed — a synthetic market-data source for the spread monitor.
//!
//! Streams bid/ask quotes for a set of currency pairs as JSON lines on stdout, one
//! message per line. The first line is a snapshot of every pair (unless
//! `--no-snapshot`), followed by one quote per pair per tick. Logs go to stderr, so the
//! output can be piped straight into the monitor:
//!
//! ```bash
//! fx_feed --interval-ms 250 | fx_monitor --symbol GBPUSD --metric bid
//! ```
//!
//! The process stops after `--count` ticks, on Ctrl+C, or when stdout is closed.
#![warn(missing_docs)]
mod args;
mod generator;

use crate::args::Args;
use crate::generator::{GeneratorConfig, GeneratorEvent, QuoteGenerator};
use clap::Parser;
use crossbeam_channel::Receiver;
use fx_common::MonitorError;
use fx_common::Result;
use fx_common::pairs::Pair;
use fx_common::paths::load_pairs;
use log::{error, info};
use std::io::{ErrorKind, Write};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

/// Writes every generated message to `out` until the generator shuts down.
///
/// A closed pipe on the consumer side is a normal way to stop and returns `Ok`.
fn publish_loop<W: Write>(
    events: Receiver<GeneratorEvent>,
    out: &mut W,
    shutdown: &AtomicBool,
) -> Result<u64, MonitorError> {
    let mut published = 0;
    for event in events.iter() {
        let message = match event {
            GeneratorEvent::Message(message) => message,
            GeneratorEvent::Shutdown => break,
        };
        let line = message.to_json_line()?;
        let written = writeln!(out, "{}", line).and_then(|_| out.flush());
        match written {
            Ok(()) => published += 1,
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                info!("Consumer closed the stream");
                shutdown.store(true, Ordering::SeqCst);
                break;
            }
            Err(e) => {
                error!("Failed to write feed line: {}", e);
                shutdown.store(true, Ordering::SeqCst);
                return Err(MonitorError::Io(e));
            }
        }
    }
    Ok(published)
}

fn main() -> Result<(), MonitorError> {
    init_logger();
    let args = Args::parse();
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Stopping feed...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .map_err(|e| MonitorError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    let pairs = if !args.pair.is_empty() {
        args.pair.clone()
    } else {
        match args.pairs.as_deref() {
            Some(raw) => load_pairs(raw)?,
            None => Pair::all(),
        }
    };
    if pairs.is_empty() {
        return Err(MonitorError::ParsePairsFile(String::from("no pairs listed")));
    }
    info!("Pairs: {:?}", pairs);

    let config = GeneratorConfig {
        pairs,
        interval: Duration::from_millis(args.interval_ms),
        count: args.count,
        snapshot: !args.no_snapshot,
    };
    let events = QuoteGenerator::start(config, shutdown.clone());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let published = publish_loop(events, &mut out, &shutdown)?;
    info!("Feed finished after {} lines", published);
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
