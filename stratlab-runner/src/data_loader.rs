//! Bar loading for the runner.
//!
//! Two sources:
//! - CSV files with named headers (`timestamp` or `date`, then
//!   `open, high, low, close, volume`)
//! - Synthetic random walks for demos and tests
//!
//! Synthetic data is deterministic per symbol: the RNG is seeded from a
//! BLAKE3 hash of the symbol name.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Weekday};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use stratlab_core::domain::{Bar, BarError, BarSeries};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::parse_timestamp;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: no 'timestamp' or 'date' value")]
    MissingTimestamp { row: usize },

    #[error("row {row}: unrecognised date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("duplicate bar timestamp {timestamp}")]
    DuplicateTimestamp { timestamp: i64 },

    #[error("no bars found")]
    Empty,

    #[error(transparent)]
    Series(#[from] BarError),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    date: Option<String>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Load a bar series from a CSV file.
pub fn load_bars_csv(path: &Path) -> Result<BarSeries, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bars = read_bars_csv(file)?;
    info!(path = %path.display(), bars = bars.len(), "loaded bars");
    Ok(bars)
}

/// Parse CSV bars from any reader. Rows are sorted by timestamp; duplicate
/// timestamps are rejected.
pub fn read_bars_csv<R: Read>(reader: R) -> Result<BarSeries, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (i, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = record?;
        // Header is line 1.
        let line = i + 2;
        let timestamp = match (row.timestamp, row.date.as_deref()) {
            (Some(ts), _) => ts,
            (None, Some(date)) => parse_timestamp(date).ok_or_else(|| LoadError::InvalidDate {
                row: line,
                value: date.to_string(),
            })?,
            (None, None) => return Err(LoadError::MissingTimestamp { row: line }),
        };
        bars.push(Bar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }

    if bars.is_empty() {
        return Err(LoadError::Empty);
    }

    bars.sort_by_key(|b| b.timestamp);
    if let Some(pair) = bars.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
        return Err(LoadError::DuplicateTimestamp {
            timestamp: pair[0].timestamp,
        });
    }

    let insane = bars.iter().filter(|b| !b.is_sane()).count();
    if insane > 0 {
        debug!(insane, "bars with inconsistent OHLC values");
    }

    Ok(BarSeries::from_bars(&bars)?)
}

// ─── Synthetic ──────────────────────────────────────────────────────

/// Generate `n` weekday bars of a seeded random walk starting at 100.0.
///
/// Bars are stamped at midnight UTC, beginning with the first weekday on or
/// after `start`.
pub fn synthetic_bars(symbol: &str, start: i64, n: usize) -> BarSeries {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut current = DateTime::from_timestamp(start, 0)
        .map(|dt| dt.date_naive())
        .unwrap_or(NaiveDate::MIN);
    let mut price = 100.0_f64;
    let mut bars = Vec::with_capacity(n);

    while bars.len() < n {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000.0..5_000_000.0_f64).round();

        bars.push(Bar {
            timestamp: current.and_hms_opt(0, 0, 0).map_or(start, |dt| dt.and_utc().timestamp()),
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += Duration::days(1);
    }

    BarSeries::from_bars(&bars).expect("synthetic bars are strictly ascending")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
date,open,high,low,close,volume
2024-01-03,101,103,100,102,1100
2024-01-02,100,102,99,101,1000
2024-01-04,102,104,101,103,1200
";

    #[test]
    fn reads_and_sorts_dated_rows() {
        let bars = read_bars_csv(CSV.as_bytes()).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars.timestamps()[0], 1_704_153_600);
        assert_eq!(bars.close(), &[101.0, 102.0, 103.0]);
        assert_eq!(bars.volume()[2], 1_200.0);
    }

    #[test]
    fn reads_epoch_timestamps() {
        let csv = "timestamp,open,high,low,close,volume\n1704153600,1,2,0.5,1.5,10\n";
        let bars = read_bars_csv(csv.as_bytes()).unwrap();
        assert_eq!(bars.timestamps(), &[1_704_153_600]);
    }

    #[test]
    fn rejects_duplicates_and_bad_dates() {
        let dup = "date,open,high,low,close,volume\n2024-01-02,1,1,1,1,1\n2024-01-02,2,2,2,2,2\n";
        assert!(matches!(
            read_bars_csv(dup.as_bytes()),
            Err(LoadError::DuplicateTimestamp { timestamp: 1_704_153_600 })
        ));

        let bad = "date,open,high,low,close,volume\n02/01/2024,1,1,1,1,1\n";
        assert!(matches!(
            read_bars_csv(bad.as_bytes()),
            Err(LoadError::InvalidDate { row: 2, .. })
        ));

        let none = "open,high,low,close,volume\n1,1,1,1,1\n";
        assert!(matches!(
            read_bars_csv(none.as_bytes()),
            Err(LoadError::MissingTimestamp { row: 2 })
        ));

        let empty = "date,open,high,low,close,volume\n";
        assert!(matches!(read_bars_csv(empty.as_bytes()), Err(LoadError::Empty)));
    }

    #[test]
    fn synthetic_is_deterministic_and_skips_weekends() {
        // 2024-01-06 is a Saturday.
        let a = synthetic_bars("SPY", 1_704_499_200, 30);
        let b = synthetic_bars("SPY", 1_704_499_200, 30);
        let c = synthetic_bars("QQQ", 1_704_499_200, 30);
        assert_eq!(a, b);
        assert_ne!(a.close(), c.close());
        assert_eq!(a.len(), 30);
        // First bar is Monday 2024-01-08.
        assert_eq!(a.timestamps()[0], 1_704_672_000);
        for i in 0..a.len() {
            let weekday = a.datetime(i).unwrap().weekday();
            assert!(!matches!(weekday, Weekday::Sat | Weekday::Sun));
            assert!(a.is_sane(i));
        }
    }
}
