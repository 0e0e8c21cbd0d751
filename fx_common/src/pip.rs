//! Pip scale and spread calculations.
//!
//! A pip is made to represent roughly the same relative precision on every instrument:
//! the scale factor is picked from the magnitude of the bid, using the same tier
//! boundaries the price formatter uses to isolate the pip digit.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Magnitude bracket of a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Below 5, e.g. EURUSD.
    Below5,
    /// 5 to 50, e.g. EURNOK.
    Below50,
    /// 50 to 500, e.g. USDJPY.
    Below500,
    /// 500 to 5000, e.g. XAUUSD.
    Below5000,
    /// 5000 to 50000, e.g. US30USD.
    Below50000,
    /// 50000 and above, e.g. BTCUSD.
    Above50000,
}

impl Tier {
    /// Tier of `price`. NaN lands in the top tier; callers filter it out first.
    pub fn of(price: f64) -> Tier {
        if price < 5.0 {
            Tier::Below5
        } else if price < 50.0 {
            Tier::Below50
        } else if price < 500.0 {
            Tier::Below500
        } else if price < 5000.0 {
            Tier::Below5000
        } else if price < 50000.0 {
            Tier::Below50000
        } else {
            Tier::Above50000
        }
    }

    /// Multiplier that turns a price difference into pips.
    pub fn pip_factor(self) -> f64 {
        match self {
            Tier::Below5 => 10000.0,
            Tier::Below50 => 1000.0,
            Tier::Below500 => 100.0,
            Tier::Below5000 => 10.0,
            Tier::Below50000 => 1.0,
            Tier::Above50000 => 0.1,
        }
    }
}

/// Pip scale for an instrument quoted at `bid`.
pub fn pip_factor(bid: f64) -> f64 {
    Tier::of(bid).pip_factor()
}

/// Rounds half away from zero to `places` decimal places.
///
/// Ties are decided on the exact binary value of `value`: `1.075` is stored as
/// `1.07499999…` and rounds to `1.07`. Values outside `Decimal` range are returned as is.
pub fn round_dp(value: f64, places: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Spread of one bid/ask pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    /// `ask - bid` in pips, rounded to 2 places.
    pub pips: f64,
    /// `ask - bid` as a percentage of bid, rounded to 4 places. `None` when bid is zero.
    pub percent: Option<f64>,
}

impl Spread {
    /// Computes the spread, or `None` if either side is not a finite number.
    pub fn compute(bid: f64, ask: f64) -> Option<Spread> {
        if !bid.is_finite() || !ask.is_finite() {
            return None;
        }
        let diff = ask - bid;
        let pips = round_dp(diff * pip_factor(bid), 2);
        let percent = (bid != 0.0)
            .then(|| diff / bid * 100.0)
            .filter(|p| p.is_finite())
            .map(|p| round_dp(p, 4));

        Some(Spread { pips, percent })
    }
}

/// Spread percentage for display: four decimals and a `%`, or `-` when undefined.
pub fn display_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{:.4}%", p),
        None => String::from("-"),
    }
}
