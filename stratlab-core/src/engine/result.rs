//! Run output types.

use crate::domain::{ResultId, Trade};
use crate::engine::settings::BacktestSettings;
use crate::performance::Performance;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: i64,
    pub equity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub timestamp: i64,
    /// Absolute decline from the high-water mark.
    pub drawdown: f64,
    /// Decline as a percentage of the high-water mark.
    pub drawdown_pct: f64,
}

/// Terminal, read-only output of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub id: ResultId,
    pub settings: BacktestSettings,
    pub trades: Vec<Trade>,
    pub performance: Performance,
    /// Seed point at the start bar, then one point per simulated step.
    pub equity: Vec<EquityPoint>,
    /// Aligned with `equity`.
    pub drawdowns: Vec<DrawdownPoint>,
}

impl BacktestResult {
    /// Account value once every position is closed: initial capital plus
    /// the net profit of all trades. The last equity point is recorded
    /// before the forced close and can still carry an open notional.
    pub fn final_equity(&self) -> f64 {
        self.settings.initial_capital + self.performance.total_net_profit
    }
}
