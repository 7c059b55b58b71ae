//! Indicator library.
//!
//! Every indicator is a pure function over a numeric sequence, evaluated at an
//! index over a trailing window. Positions where the window is not yet full
//! yield NaN, never an error or a panic. Each point-in-time function has an
//! aligned `*_series` companion that returns one value per input element.
//!
//! Strategies call the point-in-time form; collaborators that want a whole
//! column (charts, exports) use the series form.

pub mod bollinger;
pub mod ema;
pub mod extremes;
pub mod rsi;
pub mod sma;
pub mod trend_strength;
pub mod volatility;

pub use bollinger::{bollinger, bollinger_series, BollingerBands};
pub use ema::{ema, ema_series};
pub use extremes::{highest, lowest};
pub use rsi::{rsi, rsi_series};
pub use sma::{sma, sma_series};
pub use trend_strength::{trend_strength, trend_strength_series};
pub use volatility::{volatility, volatility_series};

/// Trailing window `[index + 1 - period, index]` as a slice, or `None` when
/// the window does not fit.
pub(crate) fn window(values: &[f64], period: usize, index: usize) -> Option<&[f64]> {
    if period == 0 || index >= values.len() || index + 1 < period {
        return None;
    }
    Some(&values[index + 1 - period..=index])
}

/// Population mean and standard deviation of a non-empty slice.
pub(crate) fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Build a daily `BarSeries` from close prices for testing.
///
/// open = prev_close (or close for the first bar), high/low = ±1 around the
/// open/close range, volume = 1000.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> crate::domain::BarSeries {
    use crate::domain::Bar;
    let bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: 1_704_153_600 + i as i64 * 86_400,
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect();
    crate::domain::BarSeries::from_bars(&bars).expect("ascending timestamps")
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
