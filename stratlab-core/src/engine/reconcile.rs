//! Trade reconciliation — pairs a closing fill with the fill it closes.

use crate::domain::{IdGen, Order, Trade};

/// Build the trade closed by `orders[closing]`.
///
/// Scans backwards from the closing order for the most recent filled order on
/// the same symbol in the opposite direction; the earlier of the two is the
/// entry. Returns `None` when no counterpart exists or the closing order is
/// unfilled.
pub fn reconcile_trade(orders: &[Order], closing: usize, ids: &mut IdGen) -> Option<Trade> {
    let exit = orders.get(closing)?;
    if !exit.is_filled() {
        return None;
    }
    let entry = orders[..closing].iter().rev().find(|o| {
        o.is_filled() && o.symbol == exit.symbol && o.direction == exit.direction.opposite()
    })?;
    Trade::from_orders(ids.next_trade(), entry, exit)
}
