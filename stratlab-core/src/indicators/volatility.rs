//! Volatility — population stddev of simple returns over the trailing
//! `period` price changes. Lookback: period.

use super::mean_std;

/// Volatility at `index`. NaN when `index < period`.
pub fn volatility(values: &[f64], period: usize, index: usize) -> f64 {
    if period == 0 || index >= values.len() || index < period {
        return f64::NAN;
    }
    let returns: Vec<f64> = (index + 1 - period..=index)
        .map(|j| (values[j] - values[j - 1]) / values[j - 1])
        .collect();
    mean_std(&returns).1
}

pub fn volatility_series(values: &[f64], period: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| volatility(values, period, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn constant_growth_has_zero_volatility() {
        let closes = [100.0, 110.0, 121.0, 133.1];
        assert_approx(volatility(&closes, 3, 3), 0.0, 1e-12);
    }

    #[test]
    fn alternating_returns() {
        // Returns: +10%, -10% → mean 0, stddev 0.1
        let closes = [100.0, 110.0, 99.0];
        assert_approx(volatility(&closes, 2, 2), 0.1, DEFAULT_EPSILON);
    }

    #[test]
    fn warmup_is_nan() {
        let closes = [100.0, 110.0, 99.0];
        assert!(volatility(&closes, 2, 1).is_nan());
        assert!(volatility(&closes, 0, 2).is_nan());
        let series = volatility_series(&closes, 2);
        assert!(series[0].is_nan() && series[1].is_nan());
        assert!(!series[2].is_nan());
    }
}
