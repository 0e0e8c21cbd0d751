//! Currency pairs and instruments tracked by default, plus pairs-file parsing.
//!
//! The state engine itself is keyed by free-form symbol strings; `Pair` only names the
//! instruments the feed generates and that a pairs file may list.

use std::io::BufRead;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::MonitorError;

/// Trait providing file parsing for pairs.
pub trait PairParser {
    /// Parses pairs from a buffered reader.
    ///
    /// Symbols may be separated by commas, spaces or new lines. Blank entries are
    /// skipped; a duplicate is kept only once. Returns an error on the first unknown symbol.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Pair>, MonitorError>;
}

impl PairParser for Pair {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, MonitorError> {
        let mut pairs = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(MonitorError::Io)?;
            for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
                if token.is_empty() {
                    continue;
                }
                match token.parse::<Self>() {
                    Ok(pair) if !pairs.contains(&pair) => pairs.push(pair),
                    Ok(_) => {}
                    Err(e) => {
                        return Err(MonitorError::ParsePairsFile(format!("{token}: {e}")));
                    }
                }
            }
        }
        Ok(pairs)
    }
}

/// Set of instruments streamed by default.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    EnumIter,
    Hash,
    Eq,
    PartialEq,
)]
#[value(rename_all = "verbatim")]
#[strum(ascii_case_insensitive)]
pub enum Pair {
    EURUSD,
    USDJPY,
    GBPUSD,
    US30USD,
    USDCAD,
    USDCHF,
    AUDUSD,
    OILUSD,
    EURCHF,
    EURJPY,
    UKOILUSD,
    UK100USD,
    XAUUSD,
    BTCUSD,
    EURNOK,
}

impl Pair {
    /// All known pairs in their canonical order.
    pub fn all() -> Vec<Pair> {
        Pair::iter().collect()
    }

    /// Rough mid price used to seed synthetic quotes.
    pub fn reference_price(self) -> f64 {
        match self {
            Pair::EURUSD => 1.0852,
            Pair::USDJPY => 150.21,
            Pair::GBPUSD => 1.2734,
            Pair::US30USD => 39012.5,
            Pair::USDCAD => 1.3621,
            Pair::USDCHF => 0.8847,
            Pair::AUDUSD => 0.6612,
            Pair::OILUSD => 78.52,
            Pair::EURCHF => 0.9601,
            Pair::EURJPY => 162.98,
            Pair::UKOILUSD => 82.31,
            Pair::UK100USD => 7702.4,
            Pair::XAUUSD => 2351.37,
            Pair::BTCUSD => 65123.0,
            Pair::EURNOK => 11.4925,
        }
    }

    /// Typical quoted spread, in pips.
    pub fn typical_spread_pips(self) -> f64 {
        match self {
            Pair::EURUSD | Pair::USDJPY => 0.8,
            Pair::GBPUSD | Pair::AUDUSD | Pair::USDCAD | Pair::USDCHF => 1.2,
            Pair::EURCHF | Pair::EURJPY => 1.8,
            Pair::EURNOK => 4.0,
            Pair::XAUUSD => 3.5,
            Pair::OILUSD | Pair::UKOILUSD => 3.0,
            Pair::US30USD | Pair::UK100USD => 2.0,
            Pair::BTCUSD => 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_mixed_separators_and_skips_duplicates() {
        let input = "eurusd, GBPUSD\n\n  XAUUSD EURUSD\n";
        let pairs = Pair::parse_from_file(Cursor::new(input)).unwrap();
        assert_eq!(pairs, vec![Pair::EURUSD, Pair::GBPUSD, Pair::XAUUSD]);
    }

    #[test]
    fn rejects_unknown_symbol() {
        let err = Pair::parse_from_file(Cursor::new("EURUSD,FOOBAR")).unwrap_err();
        assert!(matches!(err, MonitorError::ParsePairsFile(msg) if msg.starts_with("FOOBAR")));
    }

    #[test]
    fn cli_values_use_feed_symbols() {
        assert_eq!(Pair::value_variants().len(), 15);
        assert_eq!(<Pair as ValueEnum>::from_str("us30usd", true).unwrap(), Pair::US30USD);
        let name = Pair::UK100USD.to_possible_value().unwrap();
        assert_eq!(name.get_name(), "UK100USD");
    }

    #[test]
    fn display_matches_feed_symbol() {
        assert_eq!(Pair::US30USD.to_string(), "US30USD");
        assert_eq!(Pair::all().len(), 15);
    }
}
