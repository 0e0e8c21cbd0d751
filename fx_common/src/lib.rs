//!
//! Quote-stream state engine shared by the feed producer and the monitor.
//!
//! This crate aggregates:
//! - `error` — unified error type `MonitorError` used across the workspace.
//! - `result` — handy `Result<T, MonitorError>` alias.
//! - `pairs` — known currency pairs and pairs-file parsing.
//! - `paths` — CLI path arguments and pairs-file loading.
//! - `quote` — raw and normalized quote events.
//! - `time` — timestamp unit normalization, clocks and time-of-day rendering.
//! - `format` — tiered price segmentation for differential emphasis.
//! - `pip` — pip scale, spread in pips and spread percentage.
//! - `store` — per-symbol last values, change direction and spread high/low.
//! - `series` — time-windowed chart series buffer.
//! - `selection` — selected symbol/metric/retention and chart metadata.
//! - `command` — feed line messages (quotes and control commands).
//! - `dispatcher` — routes events to the store and the series buffer.
#![warn(missing_docs)]
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod pairs;
pub mod paths;
pub mod pip;
pub mod quote;
pub mod result;
pub mod selection;
pub mod series;
pub mod store;
pub mod time;

pub use command::FeedMessage;
pub use dispatcher::Dispatcher;
pub use error::MonitorError;
pub use quote::{QuoteEvent, RawQuote};
pub use result::Result;
pub use selection::{Metric, Selection};
