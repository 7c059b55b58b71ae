//! Bollinger band reversion with trend and volume confirmation.
//!
//! Long: close ≤ lower band, close above the trend SMA, volume surge.
//! Short: close ≥ upper band, close below the trend SMA, volume surge.

use super::{volume_surge, ParameterSpec, Strategy, StrategyInfo, StrategyParams};
use crate::domain::{BarSeries, Signal};
use crate::indicators::{bollinger, sma};

const PERIOD: usize = 20;
const STD_DEV: f64 = 2.0;
const TREND_PERIOD: usize = 50;
const VOLUME_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct BollingerReversion;

impl Strategy for BollingerReversion {
    fn info(&self) -> StrategyInfo {
        StrategyInfo::new(
            "bollinger_reversion",
            "Bollinger Band Reversion",
            "Fades moves to the outer bands when the trend and a volume surge agree.",
        )
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::number("period", "Band Period", PERIOD as f64).range(5.0, 100.0, 1.0),
            ParameterSpec::number("std_dev", "Std Dev Multiplier", STD_DEV).range(0.5, 4.0, 0.1),
            ParameterSpec::number("trend_period", "Trend Period", TREND_PERIOD as f64)
                .range(10.0, 200.0, 1.0),
            ParameterSpec::number("volume_multiplier", "Volume Multiplier", VOLUME_MULTIPLIER)
                .range(1.0, 5.0, 0.1),
        ]
    }

    fn execute(&self, bars: &BarSeries, index: usize, params: &StrategyParams) -> Signal {
        let close = bars.close();
        let bands = bollinger(
            close,
            params.period("period", PERIOD),
            params.number("std_dev", STD_DEV),
            index,
        );
        let trend = sma(close, params.period("trend_period", TREND_PERIOD), index);
        if bands.is_nan() || trend.is_nan() {
            return Signal::None;
        }
        if !volume_surge(bars, index, params.number("volume_multiplier", VOLUME_MULTIPLIER)) {
            return Signal::None;
        }

        let price = close[index];
        if price <= bands.lower && price > trend {
            Signal::Long
        } else if price >= bands.upper && price < trend {
            Signal::Short
        } else {
            Signal::None
        }
    }
}
