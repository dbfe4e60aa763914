use criterion::{criterion_group, criterion_main, Criterion};

use ticklab::backtest::strategy::MomentumSignal;
use ticklab::backtest::EventBacktest;
use ticklab::input::random_walk_series;
use ticklab::vecback::run_lag_ols;

pub fn full_backtest_random_data() {
    let start_date: i64 = 1609750800; //Date - 4/1/21 9:00:0000
    let series = random_walk_series("ABC", start_date, 999, 100.0, 0.0, 0.02, 42);
    let report = EventBacktest::new(series, MomentumSignal::new())
        .run()
        .unwrap();
    assert!(!report.equity_curve.is_empty());
}

pub fn vectorized_backtest_random_data() {
    let start_date: i64 = 1609750800;
    let series = random_walk_series("ABC", start_date, 999, 100.0, 0.0, 0.02, 42);
    let result = run_lag_ols(&series, 7, 0.0001).unwrap();
    assert!(!result.strategy_returns.is_empty());
}

fn benchmarks(c: &mut Criterion) {
    c.bench_function("full backtest", |b| b.iter(full_backtest_random_data));
    c.bench_function("vectorized backtest", |b| {
        b.iter(vectorized_backtest_random_data)
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
