//! Exponential Moving Average (EMA).
//!
//! Two flavours:
//!
//! - [`ema`] — point-in-time. Re-seeds from an SMA at
//!   `s = max(index + 1 - period, period - 1)` and smooths over
//!   `values[s+1..=index]`, so it only ever looks at a bounded trailing window.
//!   For `index < 2·period - 1` it equals the streaming EMA; past that it
//!   forgets everything older than the window and diverges slightly.
//! - [`ema_series`] — streaming. Seeded once with the SMA of the first
//!   `period` values, then `EMA[t] = k·x[t] + (1 - k)·EMA[t-1]`.
//!
//! Smoothing multiplier k = 2 / (period + 1). Lookback: period - 1.

use super::sma::sma;

fn multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Point-in-time EMA at `index`. NaN when `index < period - 1`.
pub fn ema(values: &[f64], period: usize, index: usize) -> f64 {
    if period == 0 || index >= values.len() || index + 1 < period {
        return f64::NAN;
    }

    let seed_index = (index + 1 - period).max(period - 1);
    let k = multiplier(period);
    values[seed_index + 1..=index]
        .iter()
        .fold(sma(values, period, seed_index), |prev, &v| {
            k * v + (1.0 - k) * prev
        })
}

/// Streaming EMA series, seeded once at index `period - 1`.
///
/// NaN in the seed window leaves the whole series NaN; NaN after the seed
/// taints everything that follows.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let seed = sma(values, period, period - 1);
    if seed.is_nan() {
        return result;
    }
    result[period - 1] = seed;

    let k = multiplier(period);
    let mut prev = seed;
    for i in period..n {
        let ema = k * values[i] + (1.0 - k) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}
