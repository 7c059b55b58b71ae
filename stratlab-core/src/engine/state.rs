//! Mutable per-run engine state.

use crate::domain::{IdGen, Order, Position, Trade};
use crate::engine::result::{DrawdownPoint, EquityPoint};
use std::collections::BTreeMap;

/// Everything that evolves during one run. Built fresh by every `run` call
/// and consumed when the result is assembled.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub cash: f64,
    /// Open positions keyed by symbol. At most one per symbol.
    pub positions: BTreeMap<String, Position>,
    /// Append-only order log.
    pub orders: Vec<Order>,
    /// Append-only trade log.
    pub trades: Vec<Trade>,
    pub equity: Vec<EquityPoint>,
    pub drawdowns: Vec<DrawdownPoint>,
    pub high_water_mark: f64,
    pub ids: IdGen,
}

impl EngineState {
    /// Fresh state with the equity and drawdown series seeded at `start_timestamp`.
    pub fn new(initial_capital: f64, start_timestamp: i64) -> Self {
        Self {
            cash: initial_capital,
            positions: BTreeMap::new(),
            orders: Vec::new(),
            trades: Vec::new(),
            equity: vec![EquityPoint {
                timestamp: start_timestamp,
                equity: initial_capital,
            }],
            drawdowns: vec![DrawdownPoint {
                timestamp: start_timestamp,
                drawdown: 0.0,
                drawdown_pct: 0.0,
            }],
            high_water_mark: initial_capital,
            ids: IdGen::default(),
        }
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    /// Cash plus unrealized P&L of every open position.
    pub fn equity(&self) -> f64 {
        self.cash
            + self
                .positions
                .values()
                .map(|p| p.unrealized_pnl)
                .sum::<f64>()
    }

    /// Mark every open position to `price` at `timestamp`.
    ///
    /// Single-asset engine: every open position belongs to the run's symbol.
    pub fn mark_to_market(&mut self, price: f64, timestamp: i64) {
        for position in self.positions.values_mut() {
            position.mark(price, timestamp);
        }
    }

    /// Append equity and drawdown points, advancing the high-water mark.
    pub fn record(&mut self, timestamp: i64) {
        let equity = self.equity();
        self.high_water_mark = self.high_water_mark.max(equity);
        let drawdown = self.high_water_mark - equity;
        let drawdown_pct = if self.high_water_mark > 0.0 {
            drawdown / self.high_water_mark * 100.0
        } else {
            0.0
        };
        self.equity.push(EquityPoint { timestamp, equity });
        self.drawdowns.push(DrawdownPoint {
            timestamp,
            drawdown,
            drawdown_pct,
        });
    }
}
