//! Synthetic quote generator.
//!
//! The `QuoteGenerator` runs a background thread that random-walks a mid price for each
//! configured `Pair` and emits one bid/ask quote per pair per tick as a `FeedMessage`.
//! Consumers receive `GeneratorEvent`s through a `crossbeam_channel` receiver.
//!
//! Event model:
//! - `GeneratorEvent::Message(FeedMessage)` — the initial snapshot or a single quote.
//! - `GeneratorEvent::Shutdown` — tick budget exhausted or stop requested.
//!
//! Design notes:
//! - Moves are sampled uniformly from `[-0.02%, +0.02%]` of the current mid.
//! - The spread wanders between 0.6x and 1.8x the pair's typical spread, so the monitor's
//!   high/low statistics have something to track.
//! - Prices are rounded to one digit below the pip, the way FX venues quote them.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{Receiver, Sender, unbounded};
use fx_common::command::{Command, FeedMessage};
use fx_common::pairs::Pair;
use fx_common::pip::{pip_factor, round_dp};
use fx_common::quote::RawQuote;
use log::{debug, info};
use rand::Rng;

/// Message sent by the generator to its consumer.
#[derive(Debug, Clone)]
pub enum GeneratorEvent {
    /// Feed line to publish.
    Message(FeedMessage),
    /// No more messages will follow.
    Shutdown,
}

/// Generator settings.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Pairs to stream.
    pub pairs: Vec<Pair>,
    /// Delay between ticks.
    pub interval: Duration,
    /// Number of ticks before stopping; `None` streams until stopped.
    pub count: Option<u64>,
    /// Emit a snapshot line before the first tick.
    pub snapshot: bool,
}

/// Background quote source.
pub struct QuoteGenerator;

impl QuoteGenerator {
    /// Start the generator thread and return the receiving end of its event channel.
    ///
    /// Setting `shutdown` stops the thread after the current tick.
    pub fn start(config: GeneratorConfig, shutdown: Arc<AtomicBool>) -> Receiver<GeneratorEvent> {
        let (tx, rx) = unbounded::<GeneratorEvent>();

        thread::spawn(move || {
            info!(
                "Quote generator started for {} pairs (Thread ID: {:?})",
                config.pairs.len(),
                thread::current().id()
            );
            Self::run(&config, &shutdown, &tx);
            let _ = tx.send(GeneratorEvent::Shutdown);
            info!("Quote generator stopped");
        });
        rx
    }

    fn run(config: &GeneratorConfig, shutdown: &AtomicBool, tx: &Sender<GeneratorEvent>) {
        let mut rng = rand::rng();
        let mut mids: HashMap<Pair, f64> = config
            .pairs
            .iter()
            .map(|p| (*p, p.reference_price()))
            .collect();

        if config.snapshot {
            let snapshot: BTreeMap<String, RawQuote> = config
                .pairs
                .iter()
                .map(|pair| {
                    let quote = quote_for(*pair, pair.reference_price(), 1.0);
                    (pair.to_string(), quote)
                })
                .collect();
            let event = GeneratorEvent::Message(FeedMessage::Command(Command::Snapshot(snapshot)));
            if tx.send(event).is_err() {
                return;
            }
        }

        let mut ticks = 0u64;
        while !shutdown.load(Ordering::Relaxed) && config.count.is_none_or(|c| ticks < c) {
            for pair in &config.pairs {
                let mid = mids.entry(*pair).or_insert_with(|| pair.reference_price());
                *mid = next_mid(&mut rng, *mid);
                let spread_scale = rng.random_range(0.6..1.8);
                let quote = quote_for(*pair, *mid, spread_scale);
                debug!("{} bid={:?} ask={:?}", quote.symbol, quote.bid, quote.ask);

                if tx.send(GeneratorEvent::Message(FeedMessage::Quote(quote))).is_err() {
                    return;
                }
            }
            ticks += 1;
            thread::sleep(config.interval);
        }
    }
}

/// Next mid price after a small uniform random move, kept strictly positive.
pub fn next_mid<R: Rng>(rng: &mut R, mid: f64) -> f64 {
    let change: f64 = rng.random_range(-0.0002..0.0002);
    (mid * (1.0 + change)).max(f64::MIN_POSITIVE)
}

/// Decimal places a pair is quoted with: one digit below the pip.
pub fn quote_decimals(price: f64) -> u32 {
    (pip_factor(price).log10().round() as i32 + 1).max(0) as u32
}

/// Builds a quote around `mid` with `spread_scale` times the pair's typical spread.
pub fn quote_for(pair: Pair, mid: f64, spread_scale: f64) -> RawQuote {
    let factor = pip_factor(mid);
    let decimals = quote_decimals(mid);
    let spread = pair.typical_spread_pips() * spread_scale / factor;
    let bid = round_dp(mid - spread / 2.0, decimals);
    let ask = round_dp(bid + spread, decimals).max(bid);

    RawQuote {
        symbol: pair.to_string(),
        bid: Some(bid.into()),
        ask: Some(ask.into()),
        ts: Some((Utc::now().timestamp_millis() as f64).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_common::pip::Spread;
    use fx_common::quote::NumberLike;

    fn price(field: &Option<NumberLike>) -> f64 {
        field.as_ref().and_then(NumberLike::as_f64).unwrap()
    }

    #[test]
    fn decimals_follow_pip_tiers() {
        assert_eq!(quote_decimals(1.0852), 5);
        assert_eq!(quote_decimals(11.49), 4);
        assert_eq!(quote_decimals(150.21), 3);
        assert_eq!(quote_decimals(2351.37), 2);
        assert_eq!(quote_decimals(39012.5), 1);
        assert_eq!(quote_decimals(65123.0), 0);
    }

    #[test]
    fn quotes_carry_the_typical_spread() {
        for pair in Pair::all() {
            let quote = quote_for(pair, pair.reference_price(), 1.0);
            let (bid, ask) = (price(&quote.bid), price(&quote.ask));
            assert!(ask >= bid, "{pair}: {bid} / {ask}");

            let pips = Spread::compute(bid, ask).unwrap().pips;
            let typical = pair.typical_spread_pips();
            assert!((pips - typical).abs() <= 1.0, "{pair}: {pips} vs {typical}");
        }
    }

    #[test]
    fn random_walk_stays_close_and_positive() {
        let mut rng = rand::rng();
        let mut mid = 1.0852;
        for _ in 0..1000 {
            let next = next_mid(&mut rng, mid);
            assert!(next > 0.0);
            assert!((next / mid - 1.0).abs() <= 0.00021);
            mid = next;
        }
    }

    #[test]
    fn bounded_run_emits_snapshot_then_quotes() {
        let config = GeneratorConfig {
            pairs: vec![Pair::EURUSD, Pair::USDJPY],
            interval: Duration::from_millis(1),
            count: Some(3),
            snapshot: true,
        };
        let rx = QuoteGenerator::start(config, Arc::new(AtomicBool::new(false)));
        let events: Vec<GeneratorEvent> = rx.iter().collect();

        assert!(matches!(
            events.first(),
            Some(GeneratorEvent::Message(FeedMessage::Command(Command::Snapshot(s)))) if s.len() == 2
        ));
        let quotes = events
            .iter()
            .filter(|e| matches!(e, GeneratorEvent::Message(FeedMessage::Quote(_))))
            .count();
        assert_eq!(quotes, 6);
        assert!(matches!(events.last(), Some(GeneratorEvent::Shutdown)));
    }
}
