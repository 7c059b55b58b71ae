//! Index-by-index backtest loop.
//!
//! Per step:
//! 1. Evaluate: ask the signal function for a signal at the index
//! 2. Reconcile: close the open position if the signal differs from it, then
//!    open a new one if the signal is not NONE
//! 3. Mark-to-market: revalue open positions at the close
//! 4. Record: append equity and drawdown points
//!
//! After the last step any open position is force-closed at the final close.

use crate::domain::{BarSeries, Direction, OrderIntent, ResultId, Signal};
use crate::engine::error::{BacktestError, RangeIssue};
use crate::engine::execution::{entry_quantity, execute_market_order};
use crate::engine::reconcile::reconcile_trade;
use crate::engine::result::BacktestResult;
use crate::engine::settings::BacktestSettings;
use crate::engine::state::EngineState;
use crate::performance::Performance;
use crate::strategies::{Strategy, StrategyParams};
use std::ops::RangeInclusive;
use tracing::{debug, info, info_span, trace};

/// A single-asset backtest engine. Holds only settings; every `run` builds
/// its own state, so one engine can be reused across bar series.
#[derive(Debug, Clone)]
pub struct Engine {
    settings: BacktestSettings,
}

impl Engine {
    pub fn new(settings: BacktestSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BacktestSettings {
        &self.settings
    }

    /// Resolve the settings' dates to an inclusive index range.
    pub fn resolve_range(&self, bars: &BarSeries) -> Result<RangeInclusive<usize>, BacktestError> {
        let start = bars
            .index_at_or_after(self.settings.start_date)
            .ok_or(RangeIssue::StartNotFound {
                start_date: self.settings.start_date,
            })?;
        let end = bars
            .index_at_or_after(self.settings.end_date)
            .ok_or(RangeIssue::EndNotFound {
                end_date: self.settings.end_date,
            })?;
        if start >= end {
            return Err(RangeIssue::NotAscending {
                start_index: start,
                end_index: end,
            }
            .into());
        }
        Ok(start..=end)
    }

    /// Run the simulation, asking `signal_fn` for a signal at every index.
    pub fn run<F>(&self, bars: &BarSeries, mut signal_fn: F) -> Result<BacktestResult, BacktestError>
    where
        F: FnMut(&BarSeries, usize, &StrategyParams) -> Signal,
    {
        let settings = &self.settings;
        let span = info_span!(
            "backtest",
            symbol = %settings.symbol,
            strategy = %settings.strategy_id
        );
        let _guard = span.enter();

        let range = self.resolve_range(bars)?;
        let (start, end) = (*range.start(), *range.end());
        let timestamps = bars.timestamps();
        let close = bars.close();

        let mut state = EngineState::new(settings.initial_capital, timestamps[start]);

        for i in range {
            let signal = signal_fn(bars, i, &settings.strategy_params);
            self.step(&mut state, signal, close[i], timestamps[i]);
            state.mark_to_market(close[i], timestamps[i]);
            state.record(timestamps[i]);
        }

        self.close_all(&mut state, close[end], timestamps[end]);

        let performance = Performance::compute(
            &state.trades,
            &state.equity,
            &state.drawdowns,
            settings.initial_capital,
            timestamps[start],
            timestamps[end],
        );
        info!(
            steps = end - start + 1,
            trades = performance.total_trades,
            net_profit = performance.total_net_profit,
            max_drawdown_pct = performance.max_drawdown_pct,
            sharpe = performance.sharpe_ratio,
            "backtest complete"
        );

        Ok(BacktestResult {
            id: result_id(settings, bars, end),
            settings: settings.clone(),
            trades: state.trades,
            performance,
            equity: state.equity,
            drawdowns: state.drawdowns,
        })
    }

    /// Turn one signal into zero, one or two orders.
    fn step(&self, state: &mut EngineState, signal: Signal, close: f64, timestamp: i64) {
        let current = state.position(&self.settings.symbol).map(|p| p.direction);
        if current == signal.direction() {
            return;
        }

        if current.is_some() {
            self.close_position(state, close, timestamp);
        }

        if let Some(direction) = signal.direction() {
            self.open_position(state, direction, close, timestamp);
        }
    }

    fn open_position(
        &self,
        state: &mut EngineState,
        direction: Direction,
        close: f64,
        timestamp: i64,
    ) {
        let quantity = entry_quantity(state.cash, self.settings.position_size, close);
        if quantity <= 0.0 {
            trace!(%direction, cash = state.cash, close, "entry skipped: zero quantity");
            return;
        }
        execute_market_order(
            state,
            &self.settings,
            direction,
            OrderIntent::Open,
            quantity,
            close,
            timestamp,
        );
    }

    /// Close the open position with an opposing order for its full quantity.
    fn close_position(&self, state: &mut EngineState, close: f64, timestamp: i64) {
        let Some(position) = state.position(&self.settings.symbol) else {
            return;
        };
        let (direction, quantity) = (position.direction.opposite(), position.quantity);
        let index = execute_market_order(
            state,
            &self.settings,
            direction,
            OrderIntent::Close,
            quantity,
            close,
            timestamp,
        );

        if let Some(trade) = reconcile_trade(&state.orders, index, &mut state.ids) {
            debug!(
                trade = %trade.id,
                direction = %trade.direction,
                entry = trade.entry_price,
                exit = trade.exit_price,
                net_profit = trade.net_profit,
                "trade closed"
            );
            state.trades.push(trade);
        }
    }

    /// Force-close whatever is still open at the final processed close.
    fn close_all(&self, state: &mut EngineState, close: f64, timestamp: i64) {
        if state.position(&self.settings.symbol).is_some() {
            debug!(timestamp, close, "force-closing open position");
            self.close_position(state, close, timestamp);
        }
    }
}

/// Run `strategy` under `settings`.
pub fn run_strategy(
    settings: &BacktestSettings,
    bars: &BarSeries,
    strategy: &dyn Strategy,
) -> Result<BacktestResult, BacktestError> {
    Engine::new(settings.clone()).run(bars, |bars, index, params| {
        strategy.execute(bars, index, params)
    })
}

/// Content hash of the settings and every bar a strategy can observe up to
/// `end`, warmup history included.
fn result_id(settings: &BacktestSettings, bars: &BarSeries, end: usize) -> ResultId {
    let settings_json = serde_json::to_vec(settings).expect("BacktestSettings must serialize");
    let mut bar_bytes = Vec::with_capacity((end + 1) * 48);
    for i in 0..=end {
        bar_bytes.extend_from_slice(&bars.timestamps()[i].to_le_bytes());
        for column in [bars.open(), bars.high(), bars.low(), bars.close(), bars.volume()] {
            bar_bytes.extend_from_slice(&column[i].to_le_bytes());
        }
    }
    ResultId::from_parts([settings_json.as_slice(), bar_bytes.as_slice()])
}
