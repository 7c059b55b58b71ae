//! Simple Moving Average (SMA).
//!
//! Mean of the trailing `period` values ending at the index.
//! Lookback: period - 1 (first valid value at index period-1).

use super::window;

/// SMA of `values[index + 1 - period..=index]`. NaN when `index < period - 1`.
pub fn sma(values: &[f64], period: usize, index: usize) -> f64 {
    match window(values, period, index) {
        Some(w) => w.iter().sum::<f64>() / period as f64,
        None => f64::NAN,
    }
}

/// Aligned SMA series with a rolling window sum.
pub fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let mut sum: f64 = values[..period].iter().sum();
    result[period - 1] = sum / period as f64;

    for i in period..n {
        sum += values[i] - values[i - period];
        // A NaN that has left the window still poisons the running sum.
        if sum.is_nan() {
            sum = values[i + 1 - period..=i].iter().sum();
        }
        result[i] = sum / period as f64;
    }

    result
}
