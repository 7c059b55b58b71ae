//! Bollinger Bands — moving average ± standard deviation multiplier.
//!
//! - Middle: SMA(period)
//! - Upper: middle + mult · stddev(period)
//! - Lower: middle - mult · stddev(period)
//!
//! Uses population stddev (divide by N). Lookback: period - 1.

use super::{mean_std, window};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub std_dev: f64,
}

impl BollingerBands {
    const NAN: Self = Self {
        upper: f64::NAN,
        middle: f64::NAN,
        lower: f64::NAN,
        std_dev: f64::NAN,
    };

    pub fn is_nan(&self) -> bool {
        self.middle.is_nan() || self.std_dev.is_nan()
    }
}

/// Bands at `index`. All fields NaN when `index < period - 1`.
pub fn bollinger(values: &[f64], period: usize, multiplier: f64, index: usize) -> BollingerBands {
    let Some(w) = window(values, period, index) else {
        return BollingerBands::NAN;
    };
    let (middle, std_dev) = mean_std(w);
    BollingerBands {
        upper: middle + multiplier * std_dev,
        middle,
        lower: middle - multiplier * std_dev,
        std_dev,
    }
}

pub fn bollinger_series(values: &[f64], period: usize, multiplier: f64) -> Vec<BollingerBands> {
    (0..values.len())
        .map(|i| bollinger(values, period, multiplier, i))
        .collect()
}
