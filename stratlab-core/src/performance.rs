//! Performance metrics — pure functions that summarise a finished run.
//!
//! Every metric is a pure function of the trade list and/or the equity and
//! drawdown series. Degenerate inputs (no trades, no losses, zero variance,
//! zero elapsed time) produce 0, and any NaN or infinite result is
//! normalised to 0.

use crate::domain::Trade;
use crate::engine::{DrawdownPoint, EquityPoint};
use serde::{Deserialize, Serialize};

/// Periods per year used to annualise the Sharpe ratio.
pub const PERIODS_PER_YEAR: f64 = 252.0;

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_YEAR: f64 = 365.25 * SECONDS_PER_DAY;

/// Summary statistics for one run. Immutable once computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percent of trades with positive net profit.
    pub win_rate: f64,
    pub total_net_profit: f64,
    /// Net profit as a percent of initial capital.
    pub total_net_profit_pct: f64,
    pub gross_profit: f64,
    /// Absolute value of the summed losing trades.
    pub gross_loss: f64,
    pub profit_factor: f64,
    pub average_win: f64,
    /// Signed, ≤ 0.
    pub average_loss: f64,
    pub largest_win: f64,
    /// Signed, ≤ 0.
    pub largest_loss: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub recovery_factor: f64,
    pub sharpe_ratio: f64,
    /// Compound annual return as a fraction (0.12 = 12 %).
    pub annualized_return: f64,
    /// Mean holding time in days.
    pub average_holding_period: f64,
}

impl Performance {
    /// Compute all metrics. `first_timestamp`/`last_timestamp` bound the
    /// simulated range and drive annualisation.
    pub fn compute(
        trades: &[Trade],
        equity: &[EquityPoint],
        drawdowns: &[DrawdownPoint],
        initial_capital: f64,
        first_timestamp: i64,
        last_timestamp: i64,
    ) -> Self {
        let winners: Vec<f64> = trades
            .iter()
            .filter(|t| t.is_winner())
            .map(|t| t.net_profit)
            .collect();
        let losers: Vec<f64> = trades
            .iter()
            .filter(|t| t.is_loser())
            .map(|t| t.net_profit)
            .collect();

        let gross_profit: f64 = winners.iter().sum();
        let gross_loss: f64 = losers.iter().sum::<f64>().abs();
        let total_net_profit: f64 = trades.iter().map(|t| t.net_profit).sum();
        let total_net_profit_pct = ratio(total_net_profit, initial_capital) * 100.0;
        let max_dd = drawdowns.iter().map(|d| d.drawdown).fold(0.0, f64::max);
        let max_dd_pct = drawdowns.iter().map(|d| d.drawdown_pct).fold(0.0, f64::max);
        let curve: Vec<f64> = equity.iter().map(|p| p.equity).collect();

        Self {
            total_trades: trades.len(),
            winning_trades: winners.len(),
            losing_trades: losers.len(),
            win_rate: ratio(winners.len() as f64, trades.len() as f64) * 100.0,
            total_net_profit: finite(total_net_profit),
            total_net_profit_pct: finite(total_net_profit_pct),
            gross_profit: finite(gross_profit),
            gross_loss: finite(gross_loss),
            profit_factor: ratio(gross_profit, gross_loss).abs(),
            average_win: ratio(gross_profit, winners.len() as f64),
            average_loss: ratio(-gross_loss, losers.len() as f64),
            largest_win: finite(winners.iter().copied().fold(0.0, f64::max)),
            largest_loss: finite(losers.iter().copied().fold(0.0, f64::min)),
            max_drawdown: finite(max_dd),
            max_drawdown_pct: finite(max_dd_pct),
            recovery_factor: ratio(total_net_profit, max_dd),
            sharpe_ratio: sharpe_ratio(&curve),
            annualized_return: annualized_return(
                total_net_profit_pct,
                last_timestamp - first_timestamp,
            ),
            average_holding_period: average_holding_days(trades),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Annualised Sharpe ratio of per-step simple returns.
///
/// Sharpe = mean / population std × √252. Returns 0.0 if std is zero or
/// there are fewer than 2 returns.
pub fn sharpe_ratio(equity_curve: &[f64]) -> f64 {
    let returns = step_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let std = (returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n).sqrt();
    if std < 1e-15 {
        return 0.0;
    }
    finite(mean / std * PERIODS_PER_YEAR.sqrt())
}

/// Compound annual return as a fraction from a total return percentage
/// earned over `elapsed_seconds`.
pub fn annualized_return(total_return_pct: f64, elapsed_seconds: i64) -> f64 {
    let years = elapsed_seconds as f64 / SECONDS_PER_YEAR;
    if years <= 0.0 {
        return 0.0;
    }
    finite((1.0 + total_return_pct / 100.0).powf(1.0 / years) - 1.0)
}

/// Mean holding time in days; 0 without trades.
pub fn average_holding_days(trades: &[Trade]) -> f64 {
    let total: i64 = trades.iter().map(Trade::holding_seconds).sum();
    ratio(total as f64, trades.len() as f64) / SECONDS_PER_DAY
}

/// Per-step simple returns; a non-positive base yields a 0 return.
pub fn step_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

// ─── Helpers ────────────────────────────────────────────────────────

fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// `num / den`, 0 when the denominator is 0 or the result is not finite.
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        finite(num / den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, OrderId, TradeId};

    fn make_trade(net_profit: f64, holding_days: i64) -> Trade {
        Trade {
            id: TradeId(1),
            symbol: "SPY".into(),
            entry_order: OrderId(1),
            exit_order: OrderId(2),
            direction: Direction::Long,
            entry_price: 100.0,
            entry_time: 0,
            exit_price: 100.0 + net_profit / 10.0,
            exit_time: holding_days * 86_400,
            quantity: 10.0,
            profit: net_profit,
            profit_pct: net_profit / 10.0,
            commission: 0.0,
            slippage: 0.0,
            net_profit,
        }
    }

    fn flat_series(n: usize, equity: f64) -> (Vec<EquityPoint>, Vec<DrawdownPoint>) {
        let eq = (0..n)
            .map(|i| EquityPoint {
                timestamp: i as i64 * 86_400,
                equity,
            })
            .collect();
        let dd = (0..n)
            .map(|i| DrawdownPoint {
                timestamp: i as i64 * 86_400,
                drawdown: 0.0,
                drawdown_pct: 0.0,
            })
            .collect();
        (eq, dd)
    }

    #[test]
    fn no_trades_is_all_zero() {
        let (eq, dd) = flat_series(50, 100_000.0);
        let perf = Performance::compute(&[], &eq, &dd, 100_000.0, 0, 49 * 86_400);
        assert_eq!(perf, Performance::default());
    }

    #[test]
    fn mixed_trades() {
        let trades = vec![
            make_trade(300.0, 2),
            make_trade(-100.0, 4),
            make_trade(100.0, 6),
            make_trade(0.0, 0),
        ];
        let (eq, dd) = flat_series(2, 100_000.0);
        let perf = Performance::compute(&trades, &eq, &dd, 100_000.0, 0, 0);
        assert_eq!(perf.total_trades, 4);
        assert_eq!(perf.winning_trades, 2);
        assert_eq!(perf.losing_trades, 1);
        assert_eq!(perf.win_rate, 50.0);
        assert_eq!(perf.total_net_profit, 300.0);
        assert!((perf.total_net_profit_pct - 0.3).abs() < 1e-12);
        assert_eq!(perf.gross_profit, 400.0);
        assert_eq!(perf.gross_loss, 100.0);
        assert_eq!(perf.profit_factor, 4.0);
        assert_eq!(perf.average_win, 200.0);
        assert_eq!(perf.average_loss, -100.0);
        assert_eq!(perf.largest_win, 300.0);
        assert_eq!(perf.largest_loss, -100.0);
        assert_eq!(perf.average_holding_period, 3.0);
        // Zero elapsed time → no annualisation.
        assert_eq!(perf.annualized_return, 0.0);
    }

    #[test]
    fn profit_factor_zero_without_losses() {
        let trades = vec![make_trade(50.0, 1)];
        let (eq, dd) = flat_series(2, 100_000.0);
        let perf = Performance::compute(&trades, &eq, &dd, 100_000.0, 0, 86_400);
        assert_eq!(perf.profit_factor, 0.0);
        assert_eq!(perf.recovery_factor, 0.0);
    }

    #[test]
    fn drawdown_and_recovery() {
        let trades = vec![make_trade(1_000.0, 1)];
        let (eq, mut dd) = flat_series(3, 100_000.0);
        dd[1].drawdown = 500.0;
        dd[1].drawdown_pct = 0.5;
        dd[2].drawdown = 200.0;
        dd[2].drawdown_pct = 0.2;
        let perf = Performance::compute(&trades, &eq, &dd, 100_000.0, 0, 86_400);
        assert_eq!(perf.max_drawdown, 500.0);
        assert_eq!(perf.max_drawdown_pct, 0.5);
        assert_eq!(perf.recovery_factor, 2.0);
    }

    #[test]
    fn sharpe_constant_equity_is_zero() {
        assert_eq!(sharpe_ratio(&vec![100_000.0; 100]), 0.0);
    }

    #[test]
    fn sharpe_constant_return_is_zero() {
        let mut eq = vec![100_000.0];
        for i in 1..253 {
            eq.push(eq[i - 1] * 1.001);
        }
        assert_eq!(sharpe_ratio(&eq), 0.0);
    }

    #[test]
    fn sharpe_known_returns() {
        // Returns +1 %, -0.5 % alternating: mean 0.25 %, population std 0.75 %
        let mut eq = vec![100.0];
        for i in 1..=100 {
            let r = if i % 2 == 1 { 1.01 } else { 0.995 };
            eq.push(eq[i - 1] * r);
        }
        let expected = 0.0025 / 0.0075 * 252.0_f64.sqrt();
        assert!((sharpe_ratio(&eq) - expected).abs() < 1e-9);
    }

    #[test]
    fn sharpe_single_return() {
        assert_eq!(sharpe_ratio(&[100.0, 101.0]), 0.0);
    }

    #[test]
    fn annualized_return_one_year() {
        let year = (365.25 * 86_400.0) as i64;
        assert!((annualized_return(10.0, year) - 0.10).abs() < 1e-9);
        // Two years at 21 % total → 10 % a year
        assert!((annualized_return(21.0, 2 * year) - 0.10).abs() < 1e-9);
        assert_eq!(annualized_return(10.0, 0), 0.0);
        // Total wipe-out beyond -100 % has no real root
        assert_eq!(annualized_return(-150.0, year / 2), 0.0);
    }

    #[test]
    fn step_returns_guard_non_positive_base() {
        assert_eq!(step_returns(&[0.0, 10.0, 20.0]), vec![0.0, 1.0]);
    }
}
