//! Immediate market-order execution at the bar close.
//!
//! Fill price moves against the trader by `slippage` percent:
//! LONG fills at close·(1 + s/100), SHORT fills at close·(1 − s/100).
//! Commission is `commission_rate` percent of fill value.

use crate::domain::{Direction, Order, OrderIntent, Position};
use crate::engine::settings::BacktestSettings;
use crate::engine::state::EngineState;
use tracing::debug;

/// Price and costs of a single fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillQuote {
    pub price: f64,
    pub commission: f64,
    pub slippage_cost: f64,
}

impl FillQuote {
    pub fn new(
        close: f64,
        direction: Direction,
        quantity: f64,
        commission_rate: f64,
        slippage: f64,
    ) -> Self {
        let price = close * (1.0 + direction.sign() * slippage / 100.0);
        Self {
            price,
            commission: price * quantity * commission_rate / 100.0,
            slippage_cost: (price - close).abs() * quantity,
        }
    }

    /// Signed cash movement: LONG pays value + commission, SHORT receives
    /// value − commission.
    pub fn cash_delta(&self, direction: Direction, quantity: f64) -> f64 {
        let value = self.price * quantity;
        match direction {
            Direction::Long => -(value + self.commission),
            Direction::Short => value - self.commission,
        }
    }
}

/// Entry size: `floor(cash · position_size / 100 / close)`. Zero when
/// nothing is affordable or inputs are degenerate.
pub fn entry_quantity(cash: f64, position_size: f64, close: f64) -> f64 {
    if close <= 0.0 || cash <= 0.0 {
        return 0.0;
    }
    let qty = (cash * position_size / 100.0 / close).floor();
    if qty.is_finite() && qty > 0.0 {
        qty
    } else {
        0.0
    }
}

/// Create, fill and book a market order. Returns the index of the order in
/// the state's order log.
///
/// Position bookkeeping: an `Open` fill creates the position or adds to a
/// same-direction one; a `Close` fill removes the position.
pub fn execute_market_order(
    state: &mut EngineState,
    settings: &BacktestSettings,
    direction: Direction,
    intent: OrderIntent,
    quantity: f64,
    close: f64,
    timestamp: i64,
) -> usize {
    let id = state.ids.next_order();
    let mut order = Order::market(
        id,
        settings.symbol.as_str(),
        direction,
        intent,
        quantity,
        timestamp,
    );
    let quote = FillQuote::new(
        close,
        direction,
        quantity,
        settings.commission_rate,
        settings.slippage,
    );
    order.fill(quote.price, timestamp, quote.commission, quote.slippage_cost);
    state.cash += quote.cash_delta(direction, quantity);

    match intent {
        OrderIntent::Open => match state.positions.get_mut(&settings.symbol) {
            Some(position) if position.direction == direction => {
                position.add(quantity, quote.price, timestamp);
            }
            _ => {
                state.positions.insert(
                    settings.symbol.clone(),
                    Position::open(
                        settings.symbol.as_str(),
                        direction,
                        quantity,
                        quote.price,
                        timestamp,
                    ),
                );
            }
        },
        OrderIntent::Close => {
            state.positions.remove(&settings.symbol);
        }
    }

    debug!(
        order = %id,
        %direction,
        ?intent,
        quantity,
        price = quote.price,
        commission = quote.commission,
        cash = state.cash,
        "order filled"
    );

    state.orders.push(order);
    state.orders.len() - 1
}
