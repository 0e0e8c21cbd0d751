//! Time-windowed series buffer feeding the chart.
//!
//! Points are appended in arrival order and trimmed from the front on every append, so
//! memory is bounded by event rate times the retention horizon rather than by session
//! length. Trimming assumes non-decreasing timestamps: an out-of-order point is kept
//! where it was inserted and may shield older points behind it from eviction.

use std::collections::VecDeque;

/// One chart sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Unix timestamp in milliseconds.
    pub ts_ms: i64,
    /// Metric value.
    pub value: f64,
}

/// Whether the buffer holds any points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    /// No points since the last reset.
    Empty,
    /// At least one point retained.
    Accumulating,
}

/// Front-trimmed sequence of samples within a rolling horizon.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    points: VecDeque<SeriesPoint>,
    retention_ms: i64,
}

impl SeriesBuffer {
    /// Creates an empty buffer keeping `retention_secs` worth of points.
    pub fn new(retention_secs: u64) -> Self {
        Self {
            points: VecDeque::new(),
            retention_ms: retention_to_ms(retention_secs),
        }
    }

    /// Drops every point.
    pub fn reset(&mut self) {
        self.points.clear();
    }

    /// Appends a point and evicts everything older than `ts_ms - retention`.
    ///
    /// Returns the number of evicted points.
    pub fn append(&mut self, ts_ms: i64, value: f64) -> usize {
        self.points.push_back(SeriesPoint { ts_ms, value });
        self.trim(ts_ms)
    }

    /// Changes the horizon and trims against the newest point.
    ///
    /// Returns the number of evicted points.
    pub fn set_retention(&mut self, retention_secs: u64) -> usize {
        self.retention_ms = retention_to_ms(retention_secs);
        match self.points.back() {
            Some(newest) => {
                let latest = newest.ts_ms;
                self.trim(latest)
            }
            None => 0,
        }
    }

    fn trim(&mut self, latest_ms: i64) -> usize {
        let cutoff = latest_ms.saturating_sub(self.retention_ms);
        let mut evicted = 0;
        while self.points.front().is_some_and(|p| p.ts_ms < cutoff) {
            self.points.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Current state.
    pub fn state(&self) -> BufferState {
        if self.points.is_empty() {
            BufferState::Empty
        } else {
            BufferState::Accumulating
        }
    }

    /// Retained points, oldest first.
    pub fn points(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }

    /// Retained points copied into a `Vec`, oldest first.
    pub fn to_vec(&self) -> Vec<SeriesPoint> {
        self.points.iter().copied().collect()
    }

    /// Newest retained point.
    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.back()
    }

    /// Number of retained points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no point is retained.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Horizon in milliseconds.
    pub fn retention_ms(&self) -> i64 {
        self.retention_ms
    }
}

fn retention_to_ms(retention_secs: u64) -> i64 {
    i64::try_from(retention_secs)
        .unwrap_or(i64::MAX)
        .saturating_mul(1000)
}
