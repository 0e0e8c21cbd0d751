//! Tiered price segmentation.
//!
//! A price is split into three pieces so a renderer can emphasise the pip digits:
//! `main_part` (big figure), `tail` (the pip digits) and `last_digit` (the sub-pip
//! digit). Where the split falls depends on the price tier, so the pip always lands
//! in `tail` whatever the instrument's scale.
//!
//! This is a presentation transform only: digits come from the shortest decimal
//! rendering of the value, zero-padded to five fractional places and then sliced.
//! Nothing is rounded.

use std::fmt;

use crate::pip::Tier;

/// Number of fractional digits the rendering is padded to.
const FRACTION_WIDTH: usize = 5;

/// Three-segment decomposition of a price string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedPrice {
    /// Leading digits, including the decimal point in the lower tiers.
    pub main_part: String,
    /// Pip digits.
    pub tail: String,
    /// Sub-pip digit (prefixed by `.` in the top tier).
    pub last_digit: String,
}

impl FormattedPrice {
    /// Fallback used for anything that is not a finite number.
    pub fn fallback() -> Self {
        FormattedPrice {
            main_part: String::from("0.00"),
            tail: String::new(),
            last_digit: String::new(),
        }
    }

    /// Segments concatenated back into one string.
    pub fn joined(&self) -> String {
        format!("{}{}{}", self.main_part, self.tail, self.last_digit)
    }
}

impl fmt::Display for FormattedPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]{}", self.main_part, self.tail, self.last_digit)
    }
}

/// Splits `price` into main part, pip tail and sub-pip digit.
///
/// `None` and non-finite values yield [`FormattedPrice::fallback`].
pub fn format_price(price: Option<f64>) -> FormattedPrice {
    let Some(price) = price.filter(|p| p.is_finite()) else {
        return FormattedPrice::fallback();
    };

    let rendered = price.to_string();
    let (int_part, dec_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let dec = format!("{:0<width$}", dec_part, width = FRACTION_WIDTH);
    let (main_part, tail, last_digit) = match Tier::of(price) {
        Tier::Below5 => (
            format!("{}.{}", int_part, &dec[0..2]),
            dec[2..4].to_string(),
            dec[4..5].to_string(),
        ),
        Tier::Below50 => (
            format!("{}.{}", int_part, &dec[0..1]),
            dec[1..3].to_string(),
            dec[3..4].to_string(),
        ),
        Tier::Below500 => (
            format!("{}.", int_part),
            dec[0..2].to_string(),
            dec[2..3].to_string(),
        ),
        Tier::Below5000 => {
            let (head, last) = split_tail(int_part, 1);
            (
                head.to_string(),
                format!("{}.{}", last, &dec[0..1]),
                dec[1..2].to_string(),
            )
        }
        Tier::Below50000 | Tier::Above50000 => {
            let (head, last) = split_tail(int_part, 2);
            (head.to_string(), last.to_string(), format!(".{}", &dec[0..2]))
        }
    };

    FormattedPrice {
        main_part,
        tail,
        last_digit,
    }
}

/// Splits off the last `n` characters of an ASCII digit string.
fn split_tail(digits: &str, n: usize) -> (&str, &str) {
    digits.split_at(digits.len().saturating_sub(n))
}
