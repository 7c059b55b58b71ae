//! Domain types for StratLab

pub mod bar;
pub mod ids;
pub mod order;
pub mod position;
pub mod signal;
pub mod trade;

pub use bar::{Bar, BarError, BarSeries};
pub use ids::{IdGen, OrderId, ResultId, TradeId};
pub use order::{Order, OrderIntent, OrderStatus, OrderType};
pub use position::Position;
pub use signal::{Direction, Signal};
pub use trade::Trade;
