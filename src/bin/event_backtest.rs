use std::env;

use anyhow::Result;
use log::info;

use ticklab::backtest::{strategy::MomentumSignal, EventBacktest};
use ticklab::input;
use ticklab::perf::{BacktestOutput, PerformanceCalculator};

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

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let path = args.get(1).map(String::as_str).unwrap_or("data/epat_eod.csv");
    let column = args.get(2).map(String::as_str).unwrap_or("EURUSD");
    let out = args
        .get(3)
        .map(String::as_str)
        .unwrap_or("event_backtest_equity.csv");

    let series = input::load_or_fetch(path, DATA_URL, column)?;
    info!("loaded {} bars for {}", series.len(), series.symbol());

    let report =
        EventBacktest::new(series.clone(), MomentumSignal::with_threshold(0.0175)).run()?;
    let equity = report.equity_values();
    let strategy = PerformanceCalculator::calculate(&equity, TRADING_DAYS);

    //Buy-and-hold benchmark over the same marked bars, normalized to its first value
    let prices = series.prices();
    let window = &prices[prices.len() - equity.len()..];
    let hold: Vec<f64> = window.iter().map(|price| price / window[0]).collect();
    let hold = PerformanceCalculator::calculate(&hold, TRADING_DAYS);

    println!("event-driven momentum backtest on {}", report.symbol);
    println!("  bars={} fills={}", report.bars, report.fills.len());
    print_summary("buy_and_hold  ", &hold);
    print_summary("event_momentum", &strategy);

    let mut writer = csv::Writer::from_path(out)?;
    for point in &report.equity_curve {
        writer.serialize(point)?;
    }
    writer.flush()?;
    info!("wrote {} equity points to {out}", report.equity_curve.len());

    Ok(())
}
