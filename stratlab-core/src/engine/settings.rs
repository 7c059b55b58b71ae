//! Backtest settings — the engine's sole configuration input.

use crate::strategies::StrategyParams;
use serde::{Deserialize, Serialize};

/// Parameters of one backtest run.
///
/// Percentages are expressed as percent, not fractions: `position_size = 10.0`
/// means 10 % of cash per entry, `commission_rate = 0.1` means 0.1 % of fill
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSettings {
    pub symbol: String,
    /// Epoch seconds; resolved to the first bar at or after it.
    pub start_date: i64,
    /// Epoch seconds; resolved to the first bar at or after it.
    pub end_date: i64,
    pub initial_capital: f64,
    /// Percent of current cash committed per entry (1–100).
    pub position_size: f64,
    /// Percent of fill value.
    pub commission_rate: f64,
    /// Percent of close, applied against the trader.
    pub slippage: f64,
    pub strategy_id: String,
    #[serde(default)]
    pub strategy_params: StrategyParams,
}

impl BacktestSettings {
    /// Frictionless settings with 100k capital and 10 % position size.
    pub fn new(symbol: &str, start_date: i64, end_date: i64) -> Self {
        Self {
            symbol: symbol.to_string(),
            start_date,
            end_date,
            initial_capital: 100_000.0,
            position_size: 10.0,
            commission_rate: 0.0,
            slippage: 0.0,
            strategy_id: String::new(),
            strategy_params: StrategyParams::new(),
        }
    }

    pub fn with_strategy(mut self, id: &str, params: StrategyParams) -> Self {
        self.strategy_id = id.to_string();
        self.strategy_params = params;
        self
    }

    pub fn with_costs(mut self, commission_rate: f64, slippage: f64) -> Self {
        self.commission_rate = commission_rate;
        self.slippage = slippage;
        self
    }

    pub fn with_capital(mut self, initial_capital: f64, position_size: f64) -> Self {
        self.initial_capital = initial_capital;
        self.position_size = position_size;
        self
    }
}
