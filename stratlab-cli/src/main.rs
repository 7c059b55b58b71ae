//! StratLab CLI — run, sweep and strategy listing commands.
//!
//! Commands:
//! - `run` — execute a backtest from a TOML config over CSV or synthetic bars
//! - `sweep` — run a parameter grid and print the top results
//! - `strategies` — list registered strategies and their parameters
//!
//! Logs go to stderr; the filter comes from `STRATLAB_LOG` (default `info`).

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use stratlab_core::domain::BarSeries;
use stratlab_core::engine::BacktestResult;
use stratlab_core::strategies::StrategyRegistry;
use stratlab_runner::{
    load_bars_csv, run_single_backtest, run_sweep, save_artifacts, synthetic_bars,
    BacktestConfig, ParamGrid, SweepMetric,
};
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "stratlab",
    about = "StratLab CLI — single-asset strategy backtester"
)]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Args)]
struct DataArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: PathBuf,

    /// CSV file with timestamp/date, open, high, low, close, volume columns.
    #[arg(long, conflicts_with = "synthetic")]
    data: Option<PathBuf>,

    /// Use a deterministic synthetic random walk instead of real data.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a single backtest.
    Run {
        #[command(flatten)]
        data: DataArgs,

        /// Output directory for result.json, trades.csv and equity.csv.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Run every combination of a parameter grid and rank the results.
    Sweep {
        #[command(flatten)]
        data: DataArgs,

        /// Parameter axis as name=v1,v2,... (repeatable).
        #[arg(long = "param", required = true)]
        params: Vec<String>,

        /// Ranking metric: net_profit, sharpe, profit_factor, recovery_factor.
        #[arg(long, default_value = "sharpe")]
        metric: SweepMetric,

        /// Number of results to print.
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// List registered strategies and their parameter schemas.
    Strategies {
        /// Print the schemas as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    let registry = StrategyRegistry::with_builtins();
    match cli.command {
        Commands::Run { data, output_dir } => run_backtest_cmd(&registry, &data, output_dir),
        Commands::Sweep {
            data,
            params,
            metric,
            top,
        } => run_sweep_cmd(&registry, &data, &params, metric, top),
        Commands::Strategies { json } => print_strategies(&registry, json),
    }
}

fn init_tracing(format: LogFormat) -> Result<()> {
    let directives = std::env::var("STRATLAB_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid STRATLAB_LOG filter '{directives}'"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
    Ok(())
}

fn load_inputs(args: &DataArgs) -> Result<(BacktestConfig, BarSeries)> {
    let config = BacktestConfig::from_file(&args.config)?;
    let bars = match (&args.data, args.synthetic) {
        (Some(path), _) => load_bars_csv(path)?,
        (None, true) => {
            let start = config.start_timestamp()?;
            let end = config.end_timestamp()?;
            // One bar per calendar day is more than the weekday walk needs.
            let n = ((end - start) / 86_400 + 1).max(2) as usize;
            warn!(symbol = %config.backtest.symbol, bars = n, "using synthetic data");
            synthetic_bars(&config.backtest.symbol, start, n)
        }
        (None, false) => bail!("one of --data or --synthetic is required"),
    };
    Ok((config, bars))
}

fn run_backtest_cmd(
    registry: &StrategyRegistry,
    args: &DataArgs,
    output_dir: PathBuf,
) -> Result<()> {
    let (config, bars) = load_inputs(args)?;
    let result = run_single_backtest(&config, registry, &bars)?;

    print_summary(&result);
    if args.synthetic {
        println!("WARNING: Results based on SYNTHETIC data");
        println!();
    }

    let run_dir = save_artifacts(&result, &output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());
    Ok(())
}

fn run_sweep_cmd(
    registry: &StrategyRegistry,
    args: &DataArgs,
    axes: &[String],
    metric: SweepMetric,
    top: usize,
) -> Result<()> {
    let (config, bars) = load_inputs(args)?;
    let mut grid = ParamGrid::new();
    for axis in axes {
        grid.add_axis_spec(axis)?;
    }

    let entries = run_sweep(&config, registry, &bars, &grid, metric)?;

    println!();
    println!(
        "=== Sweep: {} ({} combinations, ranked by {metric}) ===",
        config.strategy.id,
        entries.len()
    );
    println!(
        "{:>4}  {:<40} {:>12} {:>8} {:>8} {:>7}",
        "Rank", "Params", metric.name(), "Trades", "Win %", "MaxDD%"
    );
    println!("{}", "-".repeat(84));
    for (rank, entry) in entries.iter().take(top).enumerate() {
        let perf = &entry.result.performance;
        println!(
            "{:>4}  {:<40} {:>12.4} {:>8} {:>8.1} {:>7.2}",
            rank + 1,
            entry.params.to_string(),
            entry.score(metric),
            perf.total_trades,
            perf.win_rate,
            perf.max_drawdown_pct,
        );
    }
    println!();
    Ok(())
}

fn print_strategies(registry: &StrategyRegistry, json: bool) -> Result<()> {
    if json {
        let listing: Vec<serde_json::Value> = registry
            .all()
            .map(|s| {
                serde_json::json!({
                    "info": s.info(),
                    "parameters": s.parameters(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for strategy in registry.all() {
        let info = strategy.info();
        println!("{} — {}", info.id, info.name);
        println!("    {}", info.description);
        for spec in strategy.parameters() {
            let range = match (spec.min, spec.max) {
                (Some(min), Some(max)) => format!(" [{min} .. {max}]"),
                _ => String::new(),
            };
            println!("    {:<20} default {}{range}", spec.id, spec.default);
        }
        println!();
    }
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    let s = &result.settings;
    let p = &result.performance;
    println!();
    println!("=== Backtest Result ===");
    println!("Id:             {}", result.id.short(12));
    println!("Symbol:         {}", s.symbol);
    println!("Strategy:       {} ({})", s.strategy_id, s.strategy_params);
    println!("Trades:         {}", p.total_trades);
    println!();
    println!("--- Performance ---");
    println!("Net Profit:     {:.2} ({:.2}%)", p.total_net_profit, p.total_net_profit_pct);
    println!("Annualized:     {:.2}%", p.annualized_return * 100.0);
    println!("Sharpe:         {:.3}", p.sharpe_ratio);
    println!("Max Drawdown:   {:.2} ({:.2}%)", p.max_drawdown, p.max_drawdown_pct);
    println!("Recovery:       {:.2}", p.recovery_factor);
    println!("Win Rate:       {:.1}%", p.win_rate);
    println!("Profit Factor:  {:.2}", p.profit_factor);
    println!("Avg Win/Loss:   {:.2} / {:.2}", p.average_win, p.average_loss);
    println!("Avg Holding:    {:.1} days", p.average_holding_period);
    println!("Final Equity:   {:.2}", result.final_equity());
    println!();
}
