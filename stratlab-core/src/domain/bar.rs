//! Bar and BarSeries — the fundamental market data units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single OHLCV observation. Timestamps are epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Basic OHLC sanity check: high >= open/close/low, low <= open/close.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

/// Errors raised when a bar series is assembled from misaligned input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("timestamps must be strictly ascending (index {index}: {previous} then {current})")]
    UnorderedTimestamps {
        index: usize,
        previous: i64,
        current: i64,
    },
}

/// Aligned OHLCV columns sharing one ascending timestamp column.
///
/// Columnar so that indicators can run directly over `close()` / `volume()`
/// slices without copying. OHLC consistency is the caller's responsibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BarColumns")]
pub struct BarSeries {
    timestamps: Vec<i64>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

/// Unchecked wire form of `BarSeries`; deserialization validates it through
/// `BarSeries::new`.
#[derive(Deserialize)]
struct BarColumns {
    timestamps: Vec<i64>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl TryFrom<BarColumns> for BarSeries {
    type Error = BarError;

    fn try_from(c: BarColumns) -> Result<Self, Self::Error> {
        Self::new(c.timestamps, c.open, c.high, c.low, c.close, c.volume)
    }
}

impl BarSeries {
    /// Build a series from parallel columns.
    ///
    /// Fails if any column length differs from `timestamps` or if the
    /// timestamps are not strictly ascending.
    pub fn new(
        timestamps: Vec<i64>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<f64>,
    ) -> Result<Self, BarError> {
        let expected = timestamps.len();
        for (column, len) in [
            ("open", open.len()),
            ("high", high.len()),
            ("low", low.len()),
            ("close", close.len()),
            ("volume", volume.len()),
        ] {
            if len != expected {
                return Err(BarError::LengthMismatch {
                    column,
                    expected,
                    actual: len,
                });
            }
        }
        for (i, pair) in timestamps.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(BarError::UnorderedTimestamps {
                    index: i + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        Ok(Self {
            timestamps,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Build a series from row-oriented bars.
    pub fn from_bars(bars: &[Bar]) -> Result<Self, BarError> {
        Self::new(
            bars.iter().map(|b| b.timestamp).collect(),
            bars.iter().map(|b| b.open).collect(),
            bars.iter().map(|b| b.high).collect(),
            bars.iter().map(|b| b.low).collect(),
            bars.iter().map(|b| b.close).collect(),
            bars.iter().map(|b| b.volume).collect(),
        )
    }

    /// Build a series where open/high/low all equal close. Volume is constant.
    pub fn from_closes(
        start_timestamp: i64,
        step_seconds: i64,
        closes: &[f64],
        volume: f64,
    ) -> Self {
        let n = closes.len();
        Self {
            timestamps: (0..n as i64)
                .map(|i| start_timestamp + i * step_seconds)
                .collect(),
            open: closes.to_vec(),
            high: closes.to_vec(),
            low: closes.to_vec(),
            close: closes.to_vec(),
            volume: vec![volume; n],
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn open(&self) -> &[f64] {
        &self.open
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> &[f64] {
        &self.volume
    }

    /// Row view of the bar at `index`.
    pub fn bar(&self, index: usize) -> Option<Bar> {
        if index >= self.len() {
            return None;
        }
        Some(Bar {
            timestamp: self.timestamps[index],
            open: self.open[index],
            high: self.high[index],
            low: self.low[index],
            close: self.close[index],
            volume: self.volume[index],
        })
    }

    pub fn is_sane(&self, index: usize) -> bool {
        self.bar(index).is_some_and(|b| b.is_sane())
    }

    /// First index whose timestamp is >= `target`, or `None` if every bar is earlier.
    pub fn index_at_or_after(&self, target: i64) -> Option<usize> {
        let idx = self.timestamps.partition_point(|&ts| ts < target);
        (idx < self.len()).then_some(idx)
    }

    /// Timestamp at `index` as a UTC datetime.
    pub fn datetime(&self, index: usize) -> Option<DateTime<Utc>> {
        self.timestamps
            .get(index)
            .and_then(|&ts| DateTime::from_timestamp(ts, 0))
    }
}
