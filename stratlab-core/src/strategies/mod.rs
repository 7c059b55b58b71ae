//! Strategy abstraction — identity, parameter schema, and a pure
//! `execute(bars, index, params) -> Signal` contract.
//!
//! Strategies are stateless value types. They see only the bar series and
//! their parameters, never engine or position state, and must only read
//! `bars[0..=index]`. Insufficient history yields `Signal::None`.

pub mod bollinger;
pub mod breakout;
pub mod composite;
pub mod dual_ma;
pub mod ma_crossover;
pub mod macd;
pub mod registry;
pub mod rsi;

pub use bollinger::BollingerReversion;
pub use breakout::Breakout;
pub use composite::Composite;
pub use dual_ma::DualMaFilter;
pub use ma_crossover::MaCrossover;
pub use macd::Macd;
pub use registry::{RegistryError, StrategyRegistry};
pub use rsi::RsiThreshold;

use crate::domain::{BarSeries, Signal};
use crate::indicators::sma;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ─── Parameter values ────────────────────────────────────────────────

/// A loosely-typed parameter value as it arrives from config files or UIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Parameter mapping keyed by parameter id.
///
/// Accessors take the fallback default explicitly: a missing key or a value of
/// the wrong type silently resolves to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyParams(BTreeMap<String, ParamValue>);

impl StrategyParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<ParamValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn number(&self, key: &str, default: f64) -> f64 {
        self.get(key)
            .and_then(ParamValue::as_f64)
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }

    /// Window length; fractional values truncate and negatives clamp to 0.
    pub fn period(&self, key: &str, default: usize) -> usize {
        self.get(key)
            .and_then(ParamValue::as_f64)
            .filter(|v| v.is_finite())
            .map(|v| v as usize)
            .unwrap_or(default)
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(ParamValue::as_bool)
            .unwrap_or(default)
    }

    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key)
            .and_then(ParamValue::as_str)
            .unwrap_or(default)
    }

    /// `self` layered over `base`: keys in `self` win.
    pub fn merged_over(&self, base: &StrategyParams) -> StrategyParams {
        let mut merged = base.clone();
        for (k, v) in &self.0 {
            merged.0.insert(k.clone(), v.clone());
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for StrategyParams {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for StrategyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{}", parts.join(","))
    }
}

// ─── Parameter schema ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Number,
    Boolean,
    String,
    Select,
}

/// Describes one tunable parameter for UIs and config validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub id: String,
    pub name: String,
    pub kind: ParameterKind,
    pub default: ParamValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl ParameterSpec {
    pub fn number(id: &str, name: &str, default: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: ParameterKind::Number,
            default: ParamValue::Number(default),
            min: None,
            max: None,
            step: None,
            options: None,
        }
    }

    pub fn boolean(id: &str, name: &str, default: bool) -> Self {
        Self {
            kind: ParameterKind::Boolean,
            default: ParamValue::Bool(default),
            ..Self::number(id, name, 0.0)
        }
    }

    pub fn select(id: &str, name: &str, default: &str, options: &[&str]) -> Self {
        Self {
            kind: ParameterKind::Select,
            default: ParamValue::from(default),
            options: Some(options.iter().map(|o| o.to_string()).collect()),
            ..Self::number(id, name, 0.0)
        }
    }

    /// Attach bounds and a UI step.
    pub fn range(mut self, min: f64, max: f64, step: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self.step = Some(step);
        self
    }
}

// ─── Strategy contract ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl StrategyInfo {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// A signal generator over a bar series.
pub trait Strategy: Send + Sync {
    fn info(&self) -> StrategyInfo;

    fn parameters(&self) -> Vec<ParameterSpec>;

    /// Desired direction at `index`. Must only read `bars[0..=index]`.
    fn execute(&self, bars: &BarSeries, index: usize, params: &StrategyParams) -> Signal;

    /// Parameter mapping built from the schema defaults.
    fn default_parameters(&self) -> StrategyParams {
        self.parameters()
            .into_iter()
            .map(|spec| (spec.id, spec.default))
            .collect()
    }
}

// ─── Shared signal helpers ───────────────────────────────────────────

/// Window for the average volume that volume-surge filters compare against.
pub const VOLUME_AVERAGE_PERIOD: usize = 20;

/// Cross of `fast` over `slow` between the previous and current index.
///
/// Any NaN input means no signal.
pub(crate) fn crossover(fast_prev: f64, slow_prev: f64, fast: f64, slow: f64) -> Signal {
    if fast_prev.is_nan() || slow_prev.is_nan() || fast.is_nan() || slow.is_nan() {
        return Signal::None;
    }
    if fast_prev <= slow_prev && fast > slow {
        Signal::Long
    } else if fast_prev >= slow_prev && fast < slow {
        Signal::Short
    } else {
        Signal::None
    }
}

/// Whether volume at `index` exceeds `multiplier` × its trailing average
/// (current bar included). False while the average is warming up.
pub(crate) fn volume_surge(bars: &BarSeries, index: usize, multiplier: f64) -> bool {
    let average = sma(bars.volume(), VOLUME_AVERAGE_PERIOD, index);
    !average.is_nan() && bars.volume()[index] > multiplier * average
}
