//! RSI threshold — long when oversold, short when overbought.

use super::{ParameterSpec, Strategy, StrategyInfo, StrategyParams};
use crate::domain::{BarSeries, Signal};
use crate::indicators::rsi;

const PERIOD: usize = 14;
const OVERSOLD: f64 = 30.0;
const OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct RsiThreshold;

impl Strategy for RsiThreshold {
    fn info(&self) -> StrategyInfo {
        StrategyInfo::new(
            "rsi",
            "RSI Threshold",
            "Goes long at or below the oversold level and short at or above the overbought level.",
        )
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::number("period", "RSI Period", PERIOD as f64).range(2.0, 50.0, 1.0),
            ParameterSpec::number("oversold", "Oversold Level", OVERSOLD).range(5.0, 50.0, 1.0),
            ParameterSpec::number("overbought", "Overbought Level", OVERBOUGHT)
                .range(50.0, 95.0, 1.0),
        ]
    }

    fn execute(&self, bars: &BarSeries, index: usize, params: &StrategyParams) -> Signal {
        let period = params.period("period", PERIOD);
        let value = rsi(bars.close(), period, index);
        if value.is_nan() {
            return Signal::None;
        }

        if value <= params.number("oversold", OVERSOLD) {
            Signal::Long
        } else if value >= params.number("overbought", OVERBOUGHT) {
            Signal::Short
        } else {
            Signal::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_series;

    #[test]
    fn steady_rise_is_overbought() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let bars = make_series(&closes);
        let params = StrategyParams::new().with("period", 5.0);
        assert_eq!(RsiThreshold.execute(&bars, 10, &params), Signal::Short);
    }

    #[test]
    fn steady_fall_is_oversold() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let bars = make_series(&closes);
        let params = StrategyParams::new().with("period", 5.0);
        assert_eq!(RsiThreshold.execute(&bars, 10, &params), Signal::Long);
    }

    #[test]
    fn warmup_is_none() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let bars = make_series(&closes);
        assert_eq!(
            RsiThreshold.execute(&bars, 13, &StrategyParams::new()),
            Signal::None
        );
        assert_eq!(
            RsiThreshold.execute(&bars, 14, &StrategyParams::new()),
            Signal::Long
        );
    }
}
