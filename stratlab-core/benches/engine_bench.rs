//! Criterion benchmarks for StratLab hot paths.
//!
//! Benchmarks:
//! 1. Backtest loop per built-in strategy
//! 2. Indicators, point-in-time vs rolling series
//! 3. Performance computation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use stratlab_core::domain::{Bar, BarSeries, Signal};
use stratlab_core::engine::{run_strategy, BacktestSettings, Engine};
use stratlab_core::indicators::{ema_series, rsi, rsi_series, sma, sma_series};
use stratlab_core::performance::sharpe_ratio;
use stratlab_core::strategies::StrategyRegistry;

// ── Helpers ──────────────────────────────────────────────────────────

const T0: i64 = 1_577_923_200; // 2020-01-02

fn make_series(n: usize) -> BarSeries {
    let bars: Vec<Bar> = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar {
                timestamp: T0 + i as i64 * 86_400,
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000.0 + (i % 500) as f64 * 1_000.0,
            }
        })
        .collect();
    BarSeries::from_bars(&bars).expect("synthetic bars are ordered")
}

fn settings_for(bars: &BarSeries, strategy_id: &str) -> BacktestSettings {
    let end = *bars.timestamps().last().expect("non-empty series");
    BacktestSettings::new("BENCH", T0, end)
        .with_strategy(strategy_id, Default::default())
        .with_costs(0.05, 0.02)
}

// ── 1. Backtest loop ─────────────────────────────────────────────────

fn bench_backtest_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("backtest_loop");
    let registry = StrategyRegistry::with_builtins();

    for &bar_count in &[252, 1260] {
        let bars = make_series(bar_count);

        let settings = settings_for(&bars, "none");
        group.bench_with_input(BenchmarkId::new("null_signal", bar_count), &bar_count, |b, _| {
            let engine = Engine::new(settings.clone());
            b.iter(|| engine.run(black_box(&bars), |_, _, _| Signal::None));
        });

        for strategy in registry.all() {
            let id = strategy.info().id;
            let settings = settings_for(&bars, &id);
            group.bench_with_input(BenchmarkId::new(id, bar_count), &bar_count, |b, _| {
                b.iter(|| run_strategy(black_box(&settings), black_box(&bars), strategy));
            });
        }
    }

    group.finish();
}

// ── 2. Indicators ────────────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");
    let bars = make_series(2520);
    let close = bars.close();

    group.bench_function("sma_20_point_in_time", |b| {
        b.iter(|| (0..close.len()).map(|i| sma(black_box(close), 20, i)).sum::<f64>());
    });
    group.bench_function("sma_20_series", |b| {
        b.iter(|| sma_series(black_box(close), 20));
    });
    group.bench_function("rsi_14_point_in_time", |b| {
        b.iter(|| (0..close.len()).map(|i| rsi(black_box(close), 14, i)).sum::<f64>());
    });
    group.bench_function("rsi_14_series", |b| {
        b.iter(|| rsi_series(black_box(close), 14));
    });
    group.bench_function("ema_50_series", |b| {
        b.iter(|| ema_series(black_box(close), 50));
    });

    group.finish();
}

// ── 3. Performance ───────────────────────────────────────────────────

fn bench_performance(c: &mut Criterion) {
    let equity: Vec<f64> = (0..2520)
        .map(|i| 100_000.0 + (i as f64 * 0.05).sin() * 2_000.0 + i as f64 * 3.0)
        .collect();
    c.bench_function("sharpe_2520", |b| {
        b.iter(|| sharpe_ratio(black_box(&equity)));
    });
}

criterion_group!(
    benches,
    bench_backtest_loop,
    bench_indicators,
    bench_performance,
);
criterion_main!(benches);
