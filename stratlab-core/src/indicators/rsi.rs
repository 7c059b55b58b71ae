//! Relative Strength Index (RSI).
//!
//! Simple (unsmoothed) averages over the trailing `period` price changes:
//! RS = avg_gain / avg_loss, RSI = 100 - 100 / (1 + RS).
//! Lookback: period. Edge case: avg_loss == 0 → RSI = 100 exactly.

/// RSI at `index`. NaN when `index < period`.
pub fn rsi(values: &[f64], period: usize, index: usize) -> f64 {
    if period == 0 || index >= values.len() || index < period {
        return f64::NAN;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for j in index + 1 - period..=index {
        let change = values[j] - values[j - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }
    compute_rsi(gains / period as f64, losses / period as f64)
}

/// Aligned RSI series with rolling gain/loss sums.
pub fn rsi_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n <= period {
        return result;
    }

    let split = |j: usize| {
        let change = values[j] - values[j - 1];
        if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        }
    };

    let (mut gains, mut losses) = (0.0, 0.0);
    for j in 1..=period {
        let (g, l) = split(j);
        gains += g;
        losses += l;
    }
    result[period] = compute_rsi(gains / period as f64, losses / period as f64);

    for i in period + 1..n {
        let (g_in, l_in) = split(i);
        let (g_out, l_out) = split(i - period);
        gains += g_in - g_out;
        losses += l_in - l_out;
        if gains.is_nan() || losses.is_nan() {
            result[i] = rsi(values, period, i);
            continue;
        }
        // Rolling subtraction can leave tiny negative residue.
        result[i] = compute_rsi(
            gains.max(0.0) / period as f64,
            losses.max(0.0) / period as f64,
        );
    }

    result
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
