//! Order types and lifecycle states.

use super::ids::OrderId;
use super::signal::Direction;
use serde::{Deserialize, Serialize};

/// What kind of order. The engine only issues `Market`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Market,
    Limit { limit_price: f64 },
    Stop { trigger_price: f64 },
}

/// Order lifecycle: `Pending` → `Filled` | `Canceled` | `Rejected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Filled,
    Canceled,
    Rejected { reason: String },
}

/// Why the engine issued an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderIntent {
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: String,
    pub order_type: OrderType,
    pub direction: Direction,
    pub intent: OrderIntent,
    pub quantity: f64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub filled_at: Option<i64>,
    pub filled_price: Option<f64>,
    pub commission: f64,
    pub slippage_cost: f64,
}

impl Order {
    /// A new pending market order.
    pub fn market(
        id: OrderId,
        symbol: impl Into<String>,
        direction: Direction,
        intent: OrderIntent,
        quantity: f64,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            order_type: OrderType::Market,
            direction,
            intent,
            quantity,
            status: OrderStatus::Pending,
            created_at,
            filled_at: None,
            filled_price: None,
            commission: 0.0,
            slippage_cost: 0.0,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }

    /// Transition `Pending` → `Filled`, recording price and costs.
    ///
    /// Returns false (and leaves the order untouched) if it was not pending.
    pub fn fill(
        &mut self,
        price: f64,
        timestamp: i64,
        commission: f64,
        slippage_cost: f64,
    ) -> bool {
        if self.status != OrderStatus::Pending {
            return false;
        }
        self.status = OrderStatus::Filled;
        self.filled_at = Some(timestamp);
        self.filled_price = Some(price);
        self.commission = commission;
        self.slippage_cost = slippage_cost;
        true
    }

    /// Notional value of the fill (price × quantity), 0 when unfilled.
    pub fn fill_value(&self) -> f64 {
        self.filled_price.map_or(0.0, |p| p * self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> Order {
        Order::market(OrderId(1), "SPY", Direction::Long, OrderIntent::Open, 10.0, 100)
    }

    #[test]
    fn fill_transitions_pending_to_filled() {
        let mut order = pending();
        assert!(order.fill(101.0, 100, 1.0, 0.5));
        assert!(order.is_filled());
        assert_eq!(order.filled_price, Some(101.0));
        assert_eq!(order.filled_at, Some(100));
        assert_eq!(order.fill_value(), 1010.0);
    }

    #[test]
    fn fill_rejects_double_fill() {
        let mut order = pending();
        assert!(order.fill(101.0, 100, 0.0, 0.0));
        assert!(!order.fill(200.0, 101, 0.0, 0.0));
        assert_eq!(order.filled_price, Some(101.0));
    }

    #[test]
    fn canceled_order_cannot_fill() {
        let mut order = pending();
        order.status = OrderStatus::Canceled;
        assert!(!order.fill(101.0, 100, 0.0, 0.0));
        assert_eq!(order.fill_value(), 0.0);
    }

    #[test]
    fn order_serialization_roundtrip() {
        let mut order = pending();
        order.fill(101.0, 100, 1.0, 0.5);
        let json = serde_json::to_string(&order).unwrap();
        let deser: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deser);
    }
}
