//! MACD signal-line crossover with trend and histogram filters.
//!
//! MACD = EMA(fast) − EMA(slow), signal = EMA(signal_period) of the MACD
//! sequence, histogram = MACD − signal. All EMAs are the point-in-time
//! variant, so each value depends only on a bounded trailing window.

use super::{crossover, ParameterSpec, Strategy, StrategyInfo, StrategyParams};
use crate::domain::{BarSeries, Signal};
use crate::indicators::{ema, sma};

const FAST_PERIOD: usize = 12;
const SLOW_PERIOD: usize = 26;
const SIGNAL_PERIOD: usize = 9;
const TREND_PERIOD: usize = 50;
const MIN_HISTOGRAM: f64 = 0.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct Macd;

/// MACD line and signal line at `index - 1` and `index`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPair {
    pub macd_prev: f64,
    pub signal_prev: f64,
    pub macd: f64,
    pub signal: f64,
}

impl MacdPair {
    pub fn histogram(&self) -> f64 {
        self.macd - self.signal
    }
}

/// MACD/signal values for the crossover test at `index`.
///
/// The signal EMA at index `j` reads at most `2·signal − 1` MACD values
/// ending at `j`, so only that suffix of the MACD line is materialised.
pub fn macd_pair(
    close: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
    index: usize,
) -> Option<MacdPair> {
    if signal == 0 || index == 0 || index >= close.len() {
        return None;
    }
    let start = (index + 1).saturating_sub(2 * signal);
    let line: Vec<f64> = (start..=index)
        .map(|j| ema(close, fast, j) - ema(close, slow, j))
        .collect();

    let last = line.len() - 1;
    Some(MacdPair {
        macd_prev: line[last - 1],
        signal_prev: ema(&line[..last], signal, last - 1),
        macd: line[last],
        signal: ema(&line, signal, last),
    })
}

impl Strategy for Macd {
    fn info(&self) -> StrategyInfo {
        StrategyInfo::new(
            "macd",
            "MACD Crossover",
            "Trades MACD signal-line crosses in the direction of the trend SMA.",
        )
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::number("fast_period", "Fast Period", FAST_PERIOD as f64)
                .range(2.0, 50.0, 1.0),
            ParameterSpec::number("slow_period", "Slow Period", SLOW_PERIOD as f64)
                .range(5.0, 100.0, 1.0),
            ParameterSpec::number("signal_period", "Signal Period", SIGNAL_PERIOD as f64)
                .range(2.0, 50.0, 1.0),
            ParameterSpec::number("trend_period", "Trend Period", TREND_PERIOD as f64)
                .range(10.0, 200.0, 1.0),
            ParameterSpec::number("min_histogram", "Minimum Histogram", MIN_HISTOGRAM)
                .range(0.0, 5.0, 0.01),
        ]
    }

    fn execute(&self, bars: &BarSeries, index: usize, params: &StrategyParams) -> Signal {
        let close = bars.close();
        let Some(pair) = macd_pair(
            close,
            params.period("fast_period", FAST_PERIOD),
            params.period("slow_period", SLOW_PERIOD),
            params.period("signal_period", SIGNAL_PERIOD),
            index,
        ) else {
            return Signal::None;
        };
        let trend = sma(close, params.period("trend_period", TREND_PERIOD), index);
        if trend.is_nan() {
            return Signal::None;
        }
        if pair.histogram().abs() < params.number("min_histogram", MIN_HISTOGRAM) {
            return Signal::None;
        }

        let price = close[index];
        match crossover(pair.macd_prev, pair.signal_prev, pair.macd, pair.signal) {
            Signal::Long if price > trend => Signal::Long,
            Signal::Short if price < trend => Signal::Short,
            _ => Signal::None,
        }
    }
}
