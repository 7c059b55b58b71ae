//! Moving average crossover — golden cross and death cross detection.
//!
//! Long when the short SMA crosses above the long SMA between `index - 1`
//! and `index`; Short on the cross below.

use super::{crossover, ParameterSpec, Strategy, StrategyInfo, StrategyParams};
use crate::domain::{BarSeries, Signal};
use crate::indicators::sma;

const SHORT_PERIOD: usize = 5;
const LONG_PERIOD: usize = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct MaCrossover;

impl Strategy for MaCrossover {
    fn info(&self) -> StrategyInfo {
        StrategyInfo::new(
            "ma_crossover",
            "Moving Average Crossover",
            "Goes long when the short SMA crosses above the long SMA and short on the cross below.",
        )
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::number("short_period", "Short Period", SHORT_PERIOD as f64)
                .range(2.0, 50.0, 1.0),
            ParameterSpec::number("long_period", "Long Period", LONG_PERIOD as f64)
                .range(5.0, 200.0, 1.0),
        ]
    }

    fn execute(&self, bars: &BarSeries, index: usize, params: &StrategyParams) -> Signal {
        if index == 0 {
            return Signal::None;
        }
        let short = params.period("short_period", SHORT_PERIOD);
        let long = params.period("long_period", LONG_PERIOD);
        let close = bars.close();

        crossover(
            sma(close, short, index - 1),
            sma(close, long, index - 1),
            sma(close, short, index),
            sma(close, long, index),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_series;

    fn small() -> StrategyParams {
        StrategyParams::new()
            .with("short_period", 2.0)
            .with("long_period", 3.0)
    }

    #[test]
    fn golden_cross_goes_long() {
        let bars = make_series(&[12.0, 11.0, 10.0, 9.0, 14.0]);
        // idx3: sma2=9.5, sma3=10.0 ; idx4: sma2=11.5, sma3=11.0
        assert_eq!(MaCrossover.execute(&bars, 4, &small()), Signal::Long);
    }

    #[test]
    fn death_cross_goes_short() {
        let bars = make_series(&[8.0, 9.0, 10.0, 11.0, 6.0]);
        // idx3: sma2=10.5, sma3=10.0 ; idx4: sma2=8.5, sma3=9.0
        assert_eq!(MaCrossover.execute(&bars, 4, &small()), Signal::Short);
    }

    #[test]
    fn no_cross_is_none() {
        let bars = make_series(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        assert_eq!(MaCrossover.execute(&bars, 4, &small()), Signal::None);
    }

    #[test]
    fn warmup_is_none() {
        let bars = make_series(&[12.0, 11.0, 10.0, 9.0, 14.0]);
        assert_eq!(MaCrossover.execute(&bars, 0, &small()), Signal::None);
        assert_eq!(MaCrossover.execute(&bars, 2, &small()), Signal::None);
    }

    #[test]
    fn defaults_come_from_schema() {
        let defaults = MaCrossover.default_parameters();
        assert_eq!(defaults.period("short_period", 0), 5);
        assert_eq!(defaults.period("long_period", 0), 20);
    }
}
