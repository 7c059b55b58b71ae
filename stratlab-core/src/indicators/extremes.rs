//! Rolling extremes over a half-open index range.

use std::ops::Range;

/// Maximum of `values[range]`, NaN for an empty or out-of-bounds range.
pub fn highest(values: &[f64], range: Range<usize>) -> f64 {
    values
        .get(range)
        .filter(|w| !w.is_empty())
        .map_or(f64::NAN, |w| w.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Minimum of `values[range]`, NaN for an empty or out-of-bounds range.
pub fn lowest(values: &[f64], range: Range<usize>) -> f64 {
    values
        .get(range)
        .filter(|w| !w.is_empty())
        .map_or(f64::NAN, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}
