//! Backtesting engine — index-by-index simulation of a single strategy on a
//! single asset.
//!
//! The engine consumes a `BarSeries` and a signal function, then for each
//! index in the resolved date range:
//!
//! 1. Evaluate the signal
//! 2. Close and/or open positions with immediate market fills at the close
//! 3. Mark open positions to market
//! 4. Record equity and drawdown
//!
//! Run states: initialized → running → closing (force-close) → summarized.

pub mod error;
pub mod execution;
pub mod loop_runner;
pub mod reconcile;
pub mod result;
pub mod settings;
pub mod state;

pub use error::{BacktestError, RangeIssue};
pub use execution::{entry_quantity, FillQuote};
pub use loop_runner::{run_strategy, Engine};
pub use reconcile::reconcile_trade;
pub use result::{BacktestResult, DrawdownPoint, EquityPoint};
pub use settings::BacktestSettings;
pub use state::EngineState;
