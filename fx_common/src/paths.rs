//! Helpers for file paths given on the command line.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::error::MonitorError;
use crate::pairs::{Pair, PairParser};

/// Turns a CLI path argument into a `PathBuf`.
///
/// Surrounding whitespace and one pair of enclosing double quotes are dropped, so quoted
/// Windows paths survive shells that pass the quotes through.
pub fn cli_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let unquoted = match trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner,
        None => trimmed,
    };
    PathBuf::from(unquoted)
}

/// Reads a pairs file named by a CLI argument.
pub fn load_pairs(raw: &str) -> Result<Vec<Pair>, MonitorError> {
    let file = File::open(cli_path(raw))?;
    Pair::parse_from_file(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_whitespace_and_enclosing_quotes() {
        assert_eq!(cli_path(" \"pairs.txt\" "), PathBuf::from("pairs.txt"));
        assert_eq!(cli_path("C:\\feeds\\pairs.txt"), PathBuf::from("C:\\feeds\\pairs.txt"));
    }

    #[test]
    fn unbalanced_quote_is_kept() {
        assert_eq!(cli_path("\"pairs.txt"), PathBuf::from("\"pairs.txt"));
    }

    #[test]
    fn missing_pairs_file_is_an_io_error() {
        assert!(matches!(
            load_pairs("/nonexistent/fx/pairs.txt"),
            Err(MonitorError::Io(_))
        ));
    }
}
