use super::signal::Direction;
use serde::{Deserialize, Serialize};

/// An open position. At most one per symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub direction: Direction,
    pub quantity: f64,
    /// Volume-weighted average over same-direction additions.
    pub entry_price: f64,
    pub entry_time: i64,
    pub last_update_time: i64,
    pub unrealized_pnl: f64,
}

impl Position {
    pub fn open(
        symbol: impl Into<String>,
        direction: Direction,
        quantity: f64,
        entry_price: f64,
        entry_time: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            direction,
            quantity,
            entry_price,
            entry_time,
            last_update_time: entry_time,
            unrealized_pnl: 0.0,
        }
    }

    /// Add to the position in the same direction, re-averaging the entry price.
    pub fn add(&mut self, quantity: f64, price: f64, timestamp: i64) {
        let total = self.quantity + quantity;
        if total > 0.0 {
            self.entry_price = (self.entry_price * self.quantity + price * quantity) / total;
        }
        self.quantity = total;
        self.last_update_time = timestamp;
    }

    /// Unrealized P&L at `price`, sign-adjusted for direction.
    pub fn pnl_at(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.quantity * self.direction.sign()
    }

    /// Mark to market at `price`.
    pub fn mark(&mut self, price: f64, timestamp: i64) {
        self.unrealized_pnl = self.pnl_at(price);
        self.last_update_time = timestamp;
    }
}
