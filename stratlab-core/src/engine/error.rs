use thiserror::Error;

/// Configuration errors detected before the first step runs.
///
/// A malformed date range is the only way a run can fail; every other
/// degenerate input (no affordable quantity, no trades, zero variance)
/// degrades to neutral values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BacktestError {
    #[error("invalid date range: {0}")]
    InvalidRange(RangeIssue),
}

/// Why the settings' dates could not be resolved to a usable index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeIssue {
    #[error("no bar at or after start date {start_date}")]
    StartNotFound { start_date: i64 },

    #[error("no bar at or after end date {end_date}")]
    EndNotFound { end_date: i64 },

    #[error("start index {start_index} is not before end index {end_index}")]
    NotAscending {
        start_index: usize,
        end_index: usize,
    },
}

impl From<RangeIssue> for BacktestError {
    fn from(issue: RangeIssue) -> Self {
        BacktestError::InvalidRange(issue)
    }
}
