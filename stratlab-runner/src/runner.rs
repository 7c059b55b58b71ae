//! Backtest runner — wires config, registry and engine together.
//!
//! Entry points:
//! - `run_single_backtest()`: config + pre-loaded bars. Used by the CLI.
//! - `run_with_settings()`: explicit engine settings. Used by sweeps.

use stratlab_core::domain::BarSeries;
use stratlab_core::engine::{run_strategy, BacktestError, BacktestResult, BacktestSettings};
use stratlab_core::strategies::StrategyRegistry;
use thiserror::Error;
use tracing::info;

use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::LoadError;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("backtest error: {0}")]
    Backtest(#[from] BacktestError),
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),
    #[error("invalid parameter axis '{0}' (expected name=v1,v2,...)")]
    InvalidAxis(String),
}

/// Run the configured strategy over `bars`.
///
/// Config params are layered over the strategy's defaults, so the result's
/// settings record every parameter the strategy saw.
pub fn run_single_backtest(
    config: &BacktestConfig,
    registry: &StrategyRegistry,
    bars: &BarSeries,
) -> Result<BacktestResult, RunError> {
    let settings = config.to_settings()?;
    let result = run_with_settings(&settings, registry, bars)?;
    info!(
        id = result.id.short(12),
        symbol = %result.settings.symbol,
        strategy = %result.settings.strategy_id,
        trades = result.trades.len(),
        "run finished"
    );
    Ok(result)
}

/// Run `settings.strategy_id` from `registry` with defaults filled in.
pub fn run_with_settings(
    settings: &BacktestSettings,
    registry: &StrategyRegistry,
    bars: &BarSeries,
) -> Result<BacktestResult, RunError> {
    let strategy = registry
        .get(&settings.strategy_id)
        .ok_or_else(|| RunError::UnknownStrategy(settings.strategy_id.clone()))?;

    let mut settings = settings.clone();
    settings.strategy_params = settings
        .strategy_params
        .merged_over(&strategy.default_parameters());

    Ok(run_strategy(&settings, bars, strategy)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::synthetic_bars;

    const START: i64 = 1_672_704_000; // 2023-01-03

    fn config(strategy: &str, end: &str) -> BacktestConfig {
        BacktestConfig::from_toml(&format!(
            r#"
[backtest]
symbol = "SYN"
start_date = "2023-01-03"
end_date = "{end}"

[strategy]
id = "{strategy}"

[strategy.params]
short_period = 3
"#
        ))
        .unwrap()
    }

    #[test]
    fn merges_params_over_defaults() {
        let bars = synthetic_bars("SYN", START, 120);
        let registry = StrategyRegistry::with_builtins();
        let result = run_single_backtest(&config("ma_crossover", "2023-06-01"), &registry, &bars)
            .unwrap();
        let params = &result.settings.strategy_params;
        assert_eq!(params.period("short_period", 0), 3);
        assert_eq!(params.period("long_period", 0), 20);
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        let bars = synthetic_bars("SYN", START, 50);
        let registry = StrategyRegistry::with_builtins();
        let err = run_single_backtest(&config("nope", "2023-02-01"), &registry, &bars).unwrap_err();
        assert!(matches!(err, RunError::UnknownStrategy(id) if id == "nope"));
    }

    #[test]
    fn range_errors_surface() {
        let bars = synthetic_bars("SYN", START, 10);
        let registry = StrategyRegistry::with_builtins();
        let err = run_single_backtest(&config("rsi", "2030-01-01"), &registry, &bars).unwrap_err();
        assert!(matches!(err, RunError::Backtest(BacktestError::InvalidRange(_))));
    }
}
