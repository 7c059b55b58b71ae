//! Trend strength — |up moves − down moves| / period over the trailing
//! `period` day-over-day changes. Flat moves count for neither side.
//! Range [0, 1]. Lookback: period.

/// Trend strength at `index`. NaN when `index < period`.
pub fn trend_strength(values: &[f64], period: usize, index: usize) -> f64 {
    if period == 0 || index >= values.len() || index < period {
        return f64::NAN;
    }
    let (mut up, mut down) = (0usize, 0usize);
    for j in index + 1 - period..=index {
        if values[j] > values[j - 1] {
            up += 1;
        } else if values[j] < values[j - 1] {
            down += 1;
        }
    }
    up.abs_diff(down) as f64 / period as f64
}

pub fn trend_strength_series(values: &[f64], period: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| trend_strength(values, period, i))
        .collect()
}
