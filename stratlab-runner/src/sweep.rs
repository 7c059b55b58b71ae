//! Parameter sweeps over a grid of strategy parameters.
//!
//! Every combination runs in its own engine; combinations are independent,
//! so they fan out across rayon's thread pool. Results are ranked by a
//! `SweepMetric`, best first.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use stratlab_core::domain::BarSeries;
use stratlab_core::engine::BacktestResult;
use stratlab_core::performance::Performance;
use stratlab_core::strategies::{ParamValue, StrategyParams, StrategyRegistry};
use tracing::{info, info_span};

use crate::config::BacktestConfig;
use crate::runner::{run_with_settings, RunError};

// ─── Grid ───────────────────────────────────────────────────────────

/// Parameter id → candidate values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamGrid {
    axes: BTreeMap<String, Vec<ParamValue>>,
}

impl ParamGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axis(mut self, name: &str, values: Vec<ParamValue>) -> Self {
        self.axes.insert(name.to_string(), values);
        self
    }

    /// Parse `name=v1,v2,...` and add it as an axis. Values parse as bools,
    /// then numbers, then fall back to text.
    pub fn add_axis_spec(&mut self, spec: &str) -> Result<(), RunError> {
        let invalid = || RunError::InvalidAxis(spec.to_string());
        let (name, values) = spec.split_once('=').ok_or_else(invalid)?;
        let name = name.trim();
        let values: Vec<ParamValue> = values
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(parse_value)
            .collect();
        if name.is_empty() || values.is_empty() {
            return Err(invalid());
        }
        self.axes.insert(name.to_string(), values);
        Ok(())
    }

    /// Number of combinations. An empty grid has exactly one (no overrides).
    pub fn size(&self) -> usize {
        self.axes.values().map(Vec::len).product()
    }

    /// Cartesian product of all axes, in axis-name order with the last axis
    /// varying fastest.
    pub fn combinations(&self) -> Vec<StrategyParams> {
        let mut combos = vec![StrategyParams::new()];
        for (name, values) in &self.axes {
            combos = combos
                .iter()
                .flat_map(|base| {
                    values.iter().map(move |v| {
                        let mut next = base.clone();
                        next.insert(name, v.clone());
                        next
                    })
                })
                .collect();
        }
        combos
    }
}

fn parse_value(raw: &str) -> ParamValue {
    if let Ok(b) = raw.parse::<bool>() {
        return ParamValue::Bool(b);
    }
    match raw.parse::<f64>() {
        Ok(n) => ParamValue::Number(n),
        Err(_) => ParamValue::Text(raw.to_string()),
    }
}

// ─── Ranking ────────────────────────────────────────────────────────

/// Metric a sweep is ranked by (higher is better).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMetric {
    #[default]
    NetProfit,
    Sharpe,
    ProfitFactor,
    RecoveryFactor,
}

impl SweepMetric {
    pub const ALL: [SweepMetric; 4] = [
        SweepMetric::NetProfit,
        SweepMetric::Sharpe,
        SweepMetric::ProfitFactor,
        SweepMetric::RecoveryFactor,
    ];

    pub fn value(self, performance: &Performance) -> f64 {
        match self {
            SweepMetric::NetProfit => performance.total_net_profit,
            SweepMetric::Sharpe => performance.sharpe_ratio,
            SweepMetric::ProfitFactor => performance.profit_factor,
            SweepMetric::RecoveryFactor => performance.recovery_factor,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SweepMetric::NetProfit => "net_profit",
            SweepMetric::Sharpe => "sharpe",
            SweepMetric::ProfitFactor => "profit_factor",
            SweepMetric::RecoveryFactor => "recovery_factor",
        }
    }
}

impl fmt::Display for SweepMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SweepMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|m| m.name()).collect();
                format!("unknown metric '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

// ─── Execution ──────────────────────────────────────────────────────

/// One grid point and its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepEntry {
    /// The grid overrides for this run (before defaults are layered in).
    pub params: StrategyParams,
    pub result: BacktestResult,
}

impl SweepEntry {
    pub fn score(&self, metric: SweepMetric) -> f64 {
        metric.value(&self.result.performance)
    }
}

/// Run every combination of `grid` over the config's strategy and rank the
/// results by `metric`, best first. Grid values override config params.
pub fn run_sweep(
    config: &BacktestConfig,
    registry: &StrategyRegistry,
    bars: &BarSeries,
    grid: &ParamGrid,
    metric: SweepMetric,
) -> Result<Vec<SweepEntry>, RunError> {
    let base = config.to_settings()?;
    let span = info_span!("sweep", strategy = %base.strategy_id, combinations = grid.size());
    let _guard = span.enter();

    let mut entries = grid
        .combinations()
        .into_par_iter()
        .map(|params| {
            let mut settings = base.clone();
            settings.strategy_params = params.merged_over(&base.strategy_params);
            let result = run_with_settings(&settings, registry, bars)?;
            Ok(SweepEntry { params, result })
        })
        .collect::<Result<Vec<_>, RunError>>()?;

    // Stable sort keeps grid order among ties.
    entries.sort_by(|a, b| b.score(metric).total_cmp(&a.score(metric)));

    if let Some(best) = entries.first() {
        info!(
            runs = entries.len(),
            %metric,
            best = best.score(metric),
            params = %best.params,
            "sweep complete"
        );
    }
    Ok(entries)
}
