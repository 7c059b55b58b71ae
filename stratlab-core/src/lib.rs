//! StratLab Core — domain types, indicators, strategies, backtest engine, performance.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, signals, orders, positions, trades, IDs)
//! - Point-in-time indicators over `f64` slices
//! - Stateless strategies behind the `Strategy` trait, plus a registry
//! - Index-by-index single-asset engine with immediate market fills
//! - Performance metrics computed from trades and the equity curve

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod performance;
pub mod strategies;

pub use domain::{BarSeries, Direction, Signal};
pub use engine::{run_strategy, BacktestError, BacktestResult, BacktestSettings, Engine};
pub use performance::Performance;
pub use strategies::{Strategy, StrategyParams, StrategyRegistry};
