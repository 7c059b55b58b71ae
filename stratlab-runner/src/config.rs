//! TOML backtest configuration.
//!
//! ```toml
//! [backtest]
//! symbol = "SPY"
//! start_date = "2023-01-03"
//! end_date = "2023-12-29"
//! initial_capital = 100000.0
//! position_size = 10.0
//! commission_rate = 0.1
//! slippage = 0.05
//!
//! [strategy]
//! id = "ma_crossover"
//!
//! [strategy.params]
//! short_period = 5
//! long_period = 20
//! ```
//!
//! Dates are quoted strings (`YYYY-MM-DD` or RFC 3339) or integer epoch
//! seconds. Percentages are in percent, matching `BacktestSettings`.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use stratlab_core::engine::BacktestSettings;
use stratlab_core::strategies::StrategyParams;
use thiserror::Error;

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field}: unrecognised date '{value}' (expected YYYY-MM-DD, RFC 3339 or epoch seconds)")]
    InvalidDate { field: &'static str, value: String },

    #[error("initial_capital must be positive, got {0}")]
    NonPositiveCapital(f64),

    #[error("position_size must be within 1-100 percent, got {0}")]
    PositionSizeOutOfRange(f64),

    #[error("{field} must not be negative, got {value}")]
    NegativeRate { field: &'static str, value: f64 },
}

/// A date as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateSpec {
    Epoch(i64),
    Text(String),
}

impl DateSpec {
    /// Epoch seconds, or `None` if the text form is not a recognised date.
    /// Calendar dates resolve to midnight UTC.
    pub fn to_timestamp(&self) -> Option<i64> {
        match self {
            DateSpec::Epoch(ts) => Some(*ts),
            DateSpec::Text(s) => parse_timestamp(s),
        }
    }
}

impl fmt::Display for DateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSpec::Epoch(ts) => write!(f, "{ts}"),
            DateSpec::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Parse `YYYY-MM-DD`, RFC 3339, or a plain integer as epoch seconds.
pub fn parse_timestamp(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    s.parse::<i64>().ok()
}

fn default_initial_capital() -> f64 {
    100_000.0
}

fn default_position_size() -> f64 {
    10.0
}

/// `[backtest]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    pub symbol: String,
    pub start_date: DateSpec,
    pub end_date: DateSpec,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    #[serde(default = "default_position_size")]
    pub position_size: f64,
    #[serde(default)]
    pub commission_rate: f64,
    #[serde(default)]
    pub slippage: f64,
}

/// `[strategy]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySection {
    pub id: String,
    #[serde(default)]
    pub params: StrategyParams,
}

/// A validated backtest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    pub strategy: StrategySection,
}

impl BacktestConfig {
    /// Parse and validate a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.backtest;
        self.start_timestamp()?;
        self.end_timestamp()?;
        if b.initial_capital.is_nan() || b.initial_capital <= 0.0 {
            return Err(ConfigError::NonPositiveCapital(b.initial_capital));
        }
        if !(1.0..=100.0).contains(&b.position_size) {
            return Err(ConfigError::PositionSizeOutOfRange(b.position_size));
        }
        for (field, value) in [("commission_rate", b.commission_rate), ("slippage", b.slippage)] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::NegativeRate { field, value });
            }
        }
        Ok(())
    }

    pub fn start_timestamp(&self) -> Result<i64, ConfigError> {
        resolve("start_date", &self.backtest.start_date)
    }

    pub fn end_timestamp(&self) -> Result<i64, ConfigError> {
        resolve("end_date", &self.backtest.end_date)
    }

    /// Engine settings for this config. Strategy params are passed as written;
    /// callers layer them over registry defaults.
    pub fn to_settings(&self) -> Result<BacktestSettings, ConfigError> {
        let b = &self.backtest;
        Ok(
            BacktestSettings::new(&b.symbol, self.start_timestamp()?, self.end_timestamp()?)
                .with_capital(b.initial_capital, b.position_size)
                .with_costs(b.commission_rate, b.slippage)
                .with_strategy(&self.strategy.id, self.strategy.params.clone()),
        )
    }
}

fn resolve(field: &'static str, spec: &DateSpec) -> Result<i64, ConfigError> {
    spec.to_timestamp().ok_or_else(|| ConfigError::InvalidDate {
        field,
        value: spec.to_string(),
    })
}
