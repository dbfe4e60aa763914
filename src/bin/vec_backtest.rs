use std::env;

use anyhow::Result;
use log::info;

use ticklab::input;
use ticklab::perf::{BacktestOutput, PerformanceCalculator};
use ticklab::vecback;

const DATA_URL: &str =
    "https://raw.githubusercontent.com/yhilpisch/epatcode/refs/heads/main/data/epat_eod.csv";
const TRADING_DAYS: f64 = 252.0;

fn print_summary(name: &str, output: &BacktestOutput) {
    println!(
        "  {name}: final_equity={:.3} total_return={:.3} ann_return={:.4} ann_vol={:.4} \
         sharpe={:.2} max_drawdown={:.3} dd_duration={}",
        output.final_equity,
        output.total_return,
        output.ann_return,
        output.ann_vol,
        output.sharpe,
        output.max_drawdown,
        output.dd_duration
    );
}

///Prepend the starting stake so the curve includes the period before the first return.
fn with_initial_equity(mut equity: Vec<f64>) -> Vec<f64> {
    equity.insert(0, 1.0);
    equity
}

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let path = args.get(1).map(String::as_str).unwrap_or("data/epat_eod.csv");
    let column = args.get(2).map(String::as_str).unwrap_or("EURUSD");
    let lags: usize = args
        .get(3)
        .and_then(|value| value.parse().ok())
        .unwrap_or(7);
    let cost: f64 = args
        .get(4)
        .and_then(|value| value.parse().ok())
        .unwrap_or(0.0001);

    let series = input::load_or_fetch(path, DATA_URL, column)?;
    info!("loaded {} bars for {}", series.len(), series.symbol());

    let result = vecback::run_lag_ols(&series, lags, cost)?;
    let strategy =
        PerformanceCalculator::calculate(&with_initial_equity(result.strategy_equity()), TRADING_DAYS);
    let hold =
        PerformanceCalculator::calculate(&with_initial_equity(result.market_equity()), TRADING_DAYS);

    println!("vectorized lagged-returns OLS backtest on {}", series.symbol());
    println!(
        "  samples={} lags={} cost={} r_squared={:.4}",
        result.market_returns.len(),
        lags,
        cost,
        result.r_squared
    );
    print_summary("buy_and_hold    ", &hold);
    print_summary("lag_ols_strategy", &strategy);

    Ok(())
}
