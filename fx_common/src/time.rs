//! Timestamp helpers: unit normalization, clocks and time-of-day rendering.

use std::cell::Cell;

use chrono::{DateTime, Local, Utc};

/// Timestamps below this value are taken to be in seconds.
///
/// The producer does not state its unit, so the unit is sniffed from the magnitude:
/// `10_000_000_000` seconds is the year 2286, while the same number in milliseconds
/// is April 1970. Revisit once the producer's unit is confirmed.
pub const MILLIS_THRESHOLD: i64 = 10_000_000_000;

/// Converts a seconds-or-milliseconds Unix timestamp into milliseconds.
pub fn normalize_ts(ts: i64) -> i64 {
    if ts < MILLIS_THRESHOLD {
        ts.saturating_mul(1000)
    } else {
        ts
    }
}

/// Zone used when rendering a time of day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayZone {
    /// Coordinated Universal Time.
    #[default]
    Utc,
    /// The host's local time zone.
    Local,
}

/// Renders a timestamp as `HH:MM:SS.mmm` (24h clock).
///
/// The timestamp goes through `normalize_ts` first. Out-of-range values render as
/// `--:--:--.---`.
pub fn format_timestamp(ts: i64, zone: DisplayZone) -> String {
    const FORMAT: &str = "%H:%M:%S%.3f";

    match DateTime::<Utc>::from_timestamp_millis(normalize_ts(ts)) {
        Some(utc) => match zone {
            DisplayZone::Utc => utc.format(FORMAT).to_string(),
            DisplayZone::Local => utc.with_timezone(&Local).format(FORMAT).to_string(),
        },
        None => String::from("--:--:--.---"),
    }
}

/// Source of the current wall-clock time in Unix milliseconds.
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for deterministic sessions and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    /// Creates a clock frozen at `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    /// Moves the clock to `now_ms`.
    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}
