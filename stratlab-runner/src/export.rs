//! Artifact export — JSON result plus CSV trade tape and equity curve.
//!
//! Layout under the output directory:
//! ```text
//! <output_dir>/<result id prefix>/
//!   result.json   full BacktestResult
//!   trades.csv    one row per closed trade
//!   equity.csv    equity and drawdown per recorded point
//! ```
//! The directory name is derived from the result's content hash, so
//! re-running identical inputs overwrites the same artifacts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::DateTime;
use stratlab_core::domain::Trade;
use stratlab_core::engine::{BacktestResult, DrawdownPoint, EquityPoint};
use tracing::info;

/// Hex characters of the result id used for the artifact directory.
pub const ID_PREFIX_LEN: usize = 12;

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

pub fn import_json(json: &str) -> Result<BacktestResult> {
    serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")
}

// ─── CSV ────────────────────────────────────────────────────────────

fn iso_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Trade tape as CSV.
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "id",
        "direction",
        "entry_date",
        "entry_price",
        "exit_date",
        "exit_price",
        "quantity",
        "profit",
        "profit_pct",
        "commission",
        "slippage",
        "net_profit",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.id.to_string(),
            &t.direction.to_string(),
            &iso_date(t.entry_time),
            &format!("{:.6}", t.entry_price),
            &iso_date(t.exit_time),
            &format!("{:.6}", t.exit_price),
            &format!("{}", t.quantity),
            &format!("{:.2}", t.profit),
            &format!("{:.4}", t.profit_pct),
            &format!("{:.2}", t.commission),
            &format!("{:.2}", t.slippage),
            &format!("{:.2}", t.net_profit),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Equity and drawdown series as CSV. The two series are aligned.
pub fn export_equity_csv(equity: &[EquityPoint], drawdowns: &[DrawdownPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "date", "equity", "drawdown", "drawdown_pct"])?;
    for (point, dd) in equity.iter().zip(drawdowns) {
        wtr.write_record([
            &point.timestamp.to_string(),
            &iso_date(point.timestamp),
            &format!("{:.2}", point.equity),
            &format!("{:.2}", dd.drawdown),
            &format!("{:.4}", dd.drawdown_pct),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `result.json`, `trades.csv` and `equity.csv` under
/// `output_dir/<id prefix>/`. Returns the run directory.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(result.id.short(ID_PREFIX_LEN));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create {}", run_dir.display()))?;

    write(&run_dir.join("result.json"), &export_json(result)?)?;
    write(&run_dir.join("trades.csv"), &export_trades_csv(&result.trades)?)?;
    write(
        &run_dir.join("equity.csv"),
        &export_equity_csv(&result.equity, &result.drawdowns)?,
    )?;

    info!(dir = %run_dir.display(), "artifacts saved");
    Ok(run_dir)
}

/// Read a `result.json` written by `save_artifacts`.
pub fn load_result(path: &Path) -> Result<BacktestResult> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
