//! Parsing of the dimension strings shown in dropdowns and returned by the
//! provider.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use conndesign_sdk::ComputeError;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.?\d*").expect("static pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionError {
    #[error("empty dimension string")]
    Empty,
    #[error("`{0}` is not a number, fraction, or mixed fraction")]
    Malformed(String),
    #[error("`{text}` contains {found} numbers, expected exactly {expected}")]
    WrongCount {
        text: String,
        expected: usize,
        found: usize,
    },
}

impl From<DimensionError> for ComputeError {
    fn from(err: DimensionError) -> Self {
        ComputeError::InvalidInput(err.to_string())
    }
}

/// Parse a nominal diameter label such as `"1 1/8 in."`, `"5/8 in."` or
/// `"20 mm"` into a decimal in the label's own unit.
pub fn parse_diameter(label: &str) -> Result<f64, DimensionError> {
    let numeric = strip_unit(label.trim());
    if numeric.is_empty() {
        return Err(DimensionError::Empty);
    }
    let malformed = || DimensionError::Malformed(label.to_string());

    let mut parts = numeric.split_whitespace();
    let value = match (parts.next(), parts.next(), parts.next()) {
        (Some(whole), Some(fraction), None) => {
            let whole: u32 = whole.parse().map_err(|_| malformed())?;
            f64::from(whole) + parse_fraction(fraction).ok_or_else(malformed)?
        }
        (Some(single), None, None) if single.contains('/') => {
            parse_fraction(single).ok_or_else(malformed)?
        }
        (Some(single), None, None) => single.parse().map_err(|_| malformed())?,
        _ => return Err(malformed()),
    };
    Ok(value)
}

/// Extract the `(width, length)` pair from a slot dimension such as
/// `"0.8125 x 1.0000"`, rounded to four decimals.
///
/// Anything other than exactly two embedded numbers is an error.
pub fn slot_dimensions(text: &str) -> Result<(f64, f64), DimensionError> {
    let numbers: Vec<f64> = NUMBER
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches('.').parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| DimensionError::Malformed(text.to_string()))?;
    match numbers.as_slice() {
        [width, length] => Ok((round4(*width), round4(*length))),
        _ => Err(DimensionError::WrongCount {
            text: text.to_string(),
            expected: 2,
            found: numbers.len(),
        }),
    }
}

fn strip_unit(text: &str) -> &str {
    ["in.", "in", "mm"]
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix))
        .unwrap_or(text)
        .trim_end()
}

fn parse_fraction(text: &str) -> Option<f64> {
    let (numerator, denominator) = text.split_once('/')?;
    let numerator: u32 = numerator.parse().ok()?;
    let denominator: u32 = denominator.parse().ok()?;
    (denominator != 0).then(|| f64::from(numerator) / f64::from(denominator))
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
