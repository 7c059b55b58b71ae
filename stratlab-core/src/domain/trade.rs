//! Trade — a completed round trip: entry fill → exit fill.

use super::ids::{OrderId, TradeId};
use super::order::Order;
use super::signal::Direction;
use serde::{Deserialize, Serialize};

/// Closed round trip. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub symbol: String,
    pub entry_order: OrderId,
    pub exit_order: OrderId,
    /// Direction of the entry order (the side that was held).
    pub direction: Direction,

    pub entry_price: f64,
    pub entry_time: i64,
    pub exit_price: f64,
    pub exit_time: i64,
    pub quantity: f64,

    pub profit: f64,
    /// Gross profit as a percentage of entry notional.
    pub profit_pct: f64,
    pub commission: f64,
    pub slippage: f64,
    pub net_profit: f64,
}

impl Trade {
    /// Pair two filled orders into a trade. The earlier fill is the entry.
    ///
    /// Returns `None` if either order is unfilled.
    pub fn from_orders(id: TradeId, a: &Order, b: &Order) -> Option<Self> {
        let a_time = a.filled_at?;
        let b_time = b.filled_at?;
        let (entry, exit, entry_time, exit_time) = if a_time <= b_time {
            (a, b, a_time, b_time)
        } else {
            (b, a, b_time, a_time)
        };
        let entry_price = entry.filled_price?;
        let exit_price = exit.filled_price?;
        let quantity = entry.quantity.min(exit.quantity);

        let profit = (exit_price - entry_price) * quantity * entry.direction.sign();
        let notional = entry_price * quantity;
        let profit_pct = if notional != 0.0 {
            profit / notional * 100.0
        } else {
            0.0
        };
        let commission = entry.commission + exit.commission;
        let slippage = entry.slippage_cost + exit.slippage_cost;

        Some(Self {
            id,
            symbol: entry.symbol.clone(),
            entry_order: entry.id,
            exit_order: exit.id,
            direction: entry.direction,
            entry_price,
            entry_time,
            exit_price,
            exit_time,
            quantity,
            profit,
            profit_pct,
            commission,
            slippage,
            net_profit: profit - commission - slippage,
        })
    }

    pub fn is_winner(&self) -> bool {
        self.net_profit > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.net_profit < 0.0
    }

    /// Holding time in seconds.
    pub fn holding_seconds(&self) -> i64 {
        self.exit_time - self.entry_time
    }
}
