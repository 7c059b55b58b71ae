//! Property tests for indicator and engine invariants.
//!
//! Uses proptest to verify:
//! 1. SMA equals the naive window mean
//! 2. RSI is exactly 100 on strictly rising prices
//! 3. Equity/drawdown identity holds at every recorded point
//! 4. Runs are deterministic
//! 5. Trades never overlap and nothing is left open at the end
//! 6. Trade count equals reversals plus the forced close, and every equity
//!    point equals replayed cash plus mark-to-market P&L

use proptest::prelude::*;
use stratlab_core::domain::{BarSeries, Direction, Signal};
use stratlab_core::engine::{entry_quantity, BacktestSettings, Engine, FillQuote};
use stratlab_core::indicators::{rsi, sma};

const DAY: i64 = 86_400;
const T0: i64 = 1_704_153_600;

// ── Strategies (proptest) ────────────────────────────────────────────

// Narrow band keeps every entry affordable across 80 losing round trips.
fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(90.0..110.0_f64, 2..80)
}

fn arb_signal() -> impl Strategy<Value = Signal> {
    prop_oneof![Just(Signal::Long), Just(Signal::Short), Just(Signal::None)]
}

fn arb_run() -> impl Strategy<Value = (Vec<f64>, Vec<Signal>)> {
    arb_closes().prop_flat_map(|closes| {
        let n = closes.len();
        (Just(closes), prop::collection::vec(arb_signal(), n))
    })
}

fn run(closes: &[f64], signals: &[Signal], commission: f64, slippage: f64) -> stratlab_core::BacktestResult {
    let bars = BarSeries::from_closes(T0, DAY, closes, 1_000.0);
    let end = T0 + (closes.len() as i64 - 1) * DAY;
    let settings = BacktestSettings::new("PROP", T0, end).with_costs(commission, slippage);
    Engine::new(settings)
        .run(&bars, |_, i, _| signals[i])
        .expect("range is valid")
}

// ── 1-2. Indicators ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn sma_is_window_mean(values in prop::collection::vec(-1e4..1e4_f64, 1..60), period in 1usize..20) {
        for i in 0..values.len() {
            let got = sma(&values, period, i);
            if i + 1 < period {
                prop_assert!(got.is_nan());
            } else {
                let window = &values[i + 1 - period..=i];
                let naive = window.iter().sum::<f64>() / period as f64;
                prop_assert!((got - naive).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn rsi_is_100_when_only_rising(start in 1.0..100.0_f64, steps in prop::collection::vec(0.01..5.0_f64, 2..40)) {
        let mut values = vec![start];
        for s in &steps {
            let last = *values.last().unwrap();
            values.push(last + s);
        }
        let period = steps.len().min(14);
        prop_assert_eq!(rsi(&values, period, values.len() - 1), 100.0);
    }
}

// ── 3-5. Engine ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn drawdown_tracks_high_water_mark((closes, signals) in arb_run(), slippage in 0.0..0.5_f64) {
        let result = run(&closes, &signals, 0.1, slippage);
        prop_assert_eq!(result.equity.len(), result.drawdowns.len());
        prop_assert_eq!(result.equity.len(), closes.len() + 1);

        let mut hwm = f64::NEG_INFINITY;
        for (eq, dd) in result.equity.iter().zip(&result.drawdowns) {
            hwm = hwm.max(eq.equity);
            prop_assert_eq!(eq.timestamp, dd.timestamp);
            prop_assert!(dd.drawdown >= 0.0);
            prop_assert!((dd.drawdown - (hwm - eq.equity)).abs() < 1e-6);
        }
        prop_assert!(result.performance.max_drawdown >= 0.0);
    }

    #[test]
    fn runs_are_deterministic((closes, signals) in arb_run()) {
        let a = run(&closes, &signals, 0.05, 0.05);
        let b = run(&closes, &signals, 0.05, 0.05);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn trades_are_sequential_and_closed((closes, signals) in arb_run()) {
        let result = run(&closes, &signals, 0.0, 0.0);
        let end = T0 + (closes.len() as i64 - 1) * DAY;

        for pair in result.trades.windows(2) {
            prop_assert!(pair[0].exit_time <= pair[1].entry_time);
        }
        for trade in &result.trades {
            prop_assert!(trade.entry_time <= trade.exit_time);
            prop_assert!(trade.exit_time <= end);
            prop_assert!(trade.quantity > 0.0);
        }
        // A non-flat final signal leaves a position that must be force-closed.
        if signals.last().is_some_and(|s| !s.is_none()) {
            let last = result.trades.last();
            prop_assert!(last.is_some_and(|t| t.exit_time == end));
        }
        prop_assert_eq!(result.performance.total_trades, result.trades.len());
    }
}

// ── 6. Replay ────────────────────────────────────────────────────────

/// Independent walk over the signals: cash, the open position as
/// (direction, quantity, entry price), the number of closing fills and the
/// equity recorded after each step.
struct Replay {
    closes: usize,
    equity: Vec<f64>,
}

fn replay(closes: &[f64], signals: &[Signal], commission: f64, slippage: f64) -> Replay {
    let mut cash = 100_000.0;
    let mut open: Option<(Direction, f64, f64)> = None;
    let mut out = Replay { closes: 0, equity: vec![cash] };

    for (&close, signal) in closes.iter().zip(signals) {
        let wanted = signal.direction();
        if open.map(|(d, _, _)| d) != wanted {
            if let Some((direction, qty, _)) = open.take() {
                let side = direction.opposite();
                cash += FillQuote::new(close, side, qty, commission, slippage).cash_delta(side, qty);
                out.closes += 1;
            }
            if let Some(direction) = wanted {
                let qty = entry_quantity(cash, 10.0, close);
                if qty > 0.0 {
                    let quote = FillQuote::new(close, direction, qty, commission, slippage);
                    cash += quote.cash_delta(direction, qty);
                    open = Some((direction, qty, quote.price));
                }
            }
        }
        let unrealized = open.map_or(0.0, |(d, qty, entry)| (close - entry) * qty * d.sign());
        out.equity.push(cash + unrealized);
    }
    if open.is_some() {
        out.closes += 1;
    }
    out
}

proptest! {
    #[test]
    fn trade_count_and_equity_match_replay(
        (closes, signals) in arb_run(),
        commission in 0.0..0.3_f64,
        slippage in 0.0..0.3_f64,
    ) {
        let result = run(&closes, &signals, commission, slippage);
        let expected = replay(&closes, &signals, commission, slippage);

        prop_assert_eq!(result.trades.len(), expected.closes);
        prop_assert_eq!(result.equity.len(), expected.equity.len());
        for (point, want) in result.equity.iter().zip(&expected.equity) {
            prop_assert!(
                (point.equity - want).abs() < 1e-6,
                "equity {} != replayed {}", point.equity, want
            );
        }
    }
}
