//! Channel breakout — close beyond the prior `period`-bar high/low.
//!
//! The channel excludes the current bar. `multiplier` widens it by a
//! percentage of the channel height: band = (highest − lowest) · mult / 100.

use super::{ParameterSpec, Strategy, StrategyInfo, StrategyParams};
use crate::domain::{BarSeries, Signal};
use crate::indicators::{highest, lowest};

const PERIOD: usize = 20;
const MULTIPLIER: f64 = 0.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct Breakout;

impl Strategy for Breakout {
    fn info(&self) -> StrategyInfo {
        StrategyInfo::new(
            "breakout",
            "Channel Breakout",
            "Goes long above the prior highest high and short below the prior lowest low.",
        )
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::number("period", "Lookback Period", PERIOD as f64)
                .range(5.0, 100.0, 1.0),
            ParameterSpec::number("multiplier", "Band Multiplier (%)", MULTIPLIER)
                .range(0.0, 50.0, 0.5),
        ]
    }

    fn execute(&self, bars: &BarSeries, index: usize, params: &StrategyParams) -> Signal {
        let period = params.period("period", PERIOD);
        if period == 0 || index < period || index >= bars.len() {
            return Signal::None;
        }

        let channel = index - period..index;
        let hh = highest(bars.high(), channel.clone());
        let ll = lowest(bars.low(), channel);
        let band = (hh - ll) * params.number("multiplier", MULTIPLIER) / 100.0;
        let close = bars.close()[index];

        if close > hh + band {
            Signal::Long
        } else if close < ll - band {
            Signal::Short
        } else {
            Signal::None
        }
    }
}
