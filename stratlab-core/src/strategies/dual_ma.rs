//! Dual moving average crossover gated by volume, volatility and trend filters.
//!
//! The crossover only passes when all three gates agree at the same bar:
//! volume surge, volatility ≥ `min_volatility`, trend strength ≥
//! `min_trend_strength`. A filter that is still warming up fails its gate.

use super::{crossover, volume_surge, ParameterSpec, Strategy, StrategyInfo, StrategyParams};
use crate::domain::{BarSeries, Signal};
use crate::indicators::{sma, trend_strength, volatility};

const SHORT_PERIOD: usize = 10;
const LONG_PERIOD: usize = 30;
const VOLUME_MULTIPLIER: f64 = 1.2;
const VOLATILITY_PERIOD: usize = 20;
const MIN_VOLATILITY: f64 = 0.005;
const TREND_PERIOD: usize = 20;
const MIN_TREND_STRENGTH: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default)]
pub struct DualMaFilter;

impl DualMaFilter {
    fn gates_pass(bars: &BarSeries, index: usize, params: &StrategyParams) -> bool {
        let close = bars.close();
        let vol = volatility(
            close,
            params.period("volatility_period", VOLATILITY_PERIOD),
            index,
        );
        let trend = trend_strength(close, params.period("trend_period", TREND_PERIOD), index);

        volume_surge(bars, index, params.number("volume_multiplier", VOLUME_MULTIPLIER))
            && vol >= params.number("min_volatility", MIN_VOLATILITY)
            && trend >= params.number("min_trend_strength", MIN_TREND_STRENGTH)
    }
}

impl Strategy for DualMaFilter {
    fn info(&self) -> StrategyInfo {
        StrategyInfo::new(
            "dual_ma_filter",
            "Dual MA with Filters",
            "SMA crossover confirmed by a volume surge, minimum volatility and minimum trend strength.",
        )
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::number("short_period", "Short Period", SHORT_PERIOD as f64)
                .range(2.0, 50.0, 1.0),
            ParameterSpec::number("long_period", "Long Period", LONG_PERIOD as f64)
                .range(5.0, 200.0, 1.0),
            ParameterSpec::number("volume_multiplier", "Volume Multiplier", VOLUME_MULTIPLIER)
                .range(1.0, 5.0, 0.1),
            ParameterSpec::number(
                "volatility_period",
                "Volatility Period",
                VOLATILITY_PERIOD as f64,
            )
            .range(5.0, 100.0, 1.0),
            ParameterSpec::number("min_volatility", "Minimum Volatility", MIN_VOLATILITY)
                .range(0.0, 0.1, 0.001),
            ParameterSpec::number("trend_period", "Trend Period", TREND_PERIOD as f64)
                .range(5.0, 100.0, 1.0),
            ParameterSpec::number(
                "min_trend_strength",
                "Minimum Trend Strength",
                MIN_TREND_STRENGTH,
            )
            .range(0.0, 1.0, 0.05),
        ]
    }

    fn execute(&self, bars: &BarSeries, index: usize, params: &StrategyParams) -> Signal {
        if index == 0 || index >= bars.len() {
            return Signal::None;
        }
        let short = params.period("short_period", SHORT_PERIOD);
        let long = params.period("long_period", LONG_PERIOD);
        let close = bars.close();

        let signal = crossover(
            sma(close, short, index - 1),
            sma(close, long, index - 1),
            sma(close, short, index),
            sma(close, long, index),
        );
        if signal.is_none() || !Self::gates_pass(bars, index, params) {
            return Signal::None;
        }
        signal
    }
}
