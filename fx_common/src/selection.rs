//! What the chart is currently showing: symbol, metric and retention horizon.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::MonitorError;

/// Default chart symbol.
pub const DEFAULT_SYMBOL: &str = "EURUSD";
/// Default retention horizon in seconds.
pub const DEFAULT_RETENTION_SECS: u64 = 60;

/// Quantity plotted on the chart.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Metric {
    /// Spread in pips.
    #[default]
    Spread,
    /// Raw bid price.
    Bid,
    /// Raw ask price.
    Ask,
}

impl Metric {
    /// Parses a metric name, mapping failures to `MonitorError::UnknownMetric`.
    pub fn parse(name: &str) -> Result<Metric, MonitorError> {
        Metric::from_str(name.trim()).map_err(|_| MonitorError::UnknownMetric(name.to_string()))
    }

    /// Value of this metric for one quote. `None` when the needed input is malformed.
    pub fn value(self, bid: Option<f64>, ask: Option<f64>, spread_pips: Option<f64>) -> Option<f64> {
        match self {
            Metric::Spread => spread_pips,
            Metric::Bid => bid,
            Metric::Ask => ask,
        }
    }

    /// Chart series name and colour for this metric.
    pub fn meta(self) -> SeriesMeta {
        match self {
            Metric::Spread => SeriesMeta {
                name: "Spread (pips)",
                color: "#3a86ff",
            },
            Metric::Bid => SeriesMeta {
                name: "Bid Price",
                color: "#38b000",
            },
            Metric::Ask => SeriesMeta {
                name: "Ask Price",
                color: "#d90429",
            },
        }
    }
}

/// Rendering hints for a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesMeta {
    /// Series label.
    pub name: &'static str,
    /// Line colour as a CSS hex string.
    pub color: &'static str,
}

/// Chart selection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Symbol whose events populate the chart.
    pub symbol: String,
    /// Plotted quantity.
    pub metric: Metric,
    /// Rolling horizon in seconds.
    pub retention_secs: u64,
}

impl Selection {
    /// Creates a selection.
    pub fn new(symbol: &str, metric: Metric, retention_secs: u64) -> Self {
        Selection {
            symbol: String::from(symbol),
            metric,
            retention_secs,
        }
    }

    /// Chart title, e.g. `Spread (pips) – EURUSD`.
    pub fn title(&self) -> String {
        format!("{} – {}", self.metric.meta().name, self.symbol)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::new(DEFAULT_SYMBOL, Metric::default(), DEFAULT_RETENTION_SECS)
    }
}
