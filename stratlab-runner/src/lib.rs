//! StratLab Runner — backtest orchestration on top of `stratlab-core`.
//!
//! This crate provides:
//! - TOML configuration with validation
//! - Bar loading from CSV, plus deterministic synthetic bars
//! - Single-backtest runner with registry lookup and default params
//! - Parallel parameter sweeps with ranking
//! - JSON/CSV artifact export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod sweep;

pub use config::{BacktestConfig, ConfigError, DateSpec};
pub use data_loader::{load_bars_csv, read_bars_csv, synthetic_bars, LoadError};
pub use export::{load_result, save_artifacts};
pub use runner::{run_single_backtest, run_with_settings, RunError};
pub use sweep::{run_sweep, ParamGrid, SweepEntry, SweepMetric};
