//! Performance metrics for equity curves.
//!
//! [PerformanceCalculator] turns a sequence of portfolio values into the usual risk/return
//! diagnostics: total and annualized return, annualized volatility, Sharpe and Sortino ratios,
//! maximum drawdown with its duration, hit rate, and skewness. All quantities are fractions,
//! not percentages. Returns use a sample (ddof = 1) standard deviation.

use itertools::Itertools;
use serde::Serialize;

///Summary of one equity curve. Ratio fields are NaN when the denominator degenerates, for
///example the Sharpe ratio of a constant curve.
#[derive(Clone, Debug, Serialize)]
pub struct BacktestOutput {
    pub periods: usize,
    pub final_equity: f64,
    pub total_return: f64,
    pub ann_return: f64,
    pub ann_vol: f64,
    pub sharpe: f64,
    pub sortino: f64,
    pub max_drawdown: f64,
    pub dd_duration: usize,
    pub hit_rate: f64,
    pub skewness: f64,
}

pub struct PerformanceCalculator;

impl PerformanceCalculator {
    ///Simple returns between consecutive values, one element shorter than the input.
    pub fn returns(values: &[f64]) -> Vec<f64> {
        values
            .windows(2)
            .map(|pair| pair[1] / pair[0] - 1.0)
            .collect()
    }

    pub fn log_returns(values: &[f64]) -> Vec<f64> {
        values
            .windows(2)
            .map(|pair| (pair[1] / pair[0]).ln())
            .collect()
    }

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    ///Sample standard deviation (ddof = 1).
    pub fn volatility(returns: &[f64]) -> f64 {
        if returns.len() < 2 {
            return f64::NAN;
        }
        let mean = Self::mean(returns);
        let squared = returns
            .iter()
            .map(|ret| (ret - mean).powi(2))
            .collect_vec();
        (squared.iter().sum::<f64>() / (returns.len() - 1) as f64).sqrt()
    }

    ///Maximum drawdown (a non-positive fraction) and the longest underwater streak in
    ///periods.
    pub fn max_drawdown_and_duration(values: &[f64]) -> (f64, usize) {
        let mut peak = f64::MIN;
        let mut max_drawdown = 0.0;
        let mut streak = 0;
        let mut max_streak = 0;

        for value in values {
            if *value > peak {
                peak = *value;
            }
            let drawdown = value / peak - 1.0;
            if drawdown < max_drawdown {
                max_drawdown = drawdown;
            }
            if drawdown < 0.0 {
                streak += 1;
                if streak > max_streak {
                    max_streak = streak;
                }
            } else {
                streak = 0;
            }
        }
        (max_drawdown, max_streak)
    }

    pub fn annualize_return(mean_return: f64, periods_per_year: f64) -> f64 {
        (1.0 + mean_return).powf(periods_per_year) - 1.0
    }

    pub fn annualize_volatility(volatility: f64, periods_per_year: f64) -> f64 {
        volatility * periods_per_year.sqrt()
    }

    pub fn sharpe(returns: &[f64], periods_per_year: f64) -> f64 {
        let volatility = Self::volatility(returns);
        if !(volatility > 0.0) {
            return f64::NAN;
        }
        Self::mean(returns) / volatility * periods_per_year.sqrt()
    }

    ///Sortino ratio against a per-period target return. Downside deviation uses the root mean
    ///square of shortfalls below the target; NaN when no return falls below it.
    pub fn sortino(returns: &[f64], target: f64, periods_per_year: f64) -> f64 {
        let downside = returns
            .iter()
            .filter(|ret| **ret < target)
            .map(|ret| (ret - target).powi(2))
            .collect_vec();
        if downside.is_empty() {
            return f64::NAN;
        }
        let downside_dev = (downside.iter().sum::<f64>() / downside.len() as f64).sqrt();
        if !(downside_dev > 0.0) {
            return f64::NAN;
        }
        (Self::mean(returns) - target) / downside_dev * periods_per_year.sqrt()
    }

    ///Fraction of periods with a positive return.
    pub fn hit_rate(returns: &[f64]) -> f64 {
        returns.iter().filter(|ret| **ret > 0.0).count() as f64 / returns.len() as f64
    }

    pub fn skewness(returns: &[f64]) -> f64 {
        let volatility = Self::volatility(returns);
        if !(volatility > 0.0) {
            return f64::NAN;
        }
        let mean = Self::mean(returns);
        Self::mean(
            &returns
                .iter()
                .map(|ret| ((ret - mean) / volatility).powi(3))
                .collect_vec(),
        )
    }

    ///Compute the full summary for an equity curve sampled `periods_per_year` times per year.
    pub fn calculate(values: &[f64], periods_per_year: f64) -> BacktestOutput {
        let returns = Self::returns(values);
        let volatility = Self::volatility(&returns);
        let (max_drawdown, dd_duration) = Self::max_drawdown_and_duration(values);

        let total_return = match (values.first(), values.last()) {
            (Some(first), Some(last)) => last / first - 1.0,
            _ => f64::NAN,
        };

        BacktestOutput {
            periods: values.len(),
            final_equity: values.last().copied().unwrap_or(f64::NAN),
            total_return,
            ann_return: Self::annualize_return(Self::mean(&returns), periods_per_year),
            ann_vol: Self::annualize_volatility(volatility, periods_per_year),
            sharpe: Self::sharpe(&returns, periods_per_year),
            sortino: Self::sortino(&returns, 0.0, periods_per_year),
            max_drawdown,
            dd_duration,
            hit_rate: Self::hit_rate(&returns),
            skewness: Self::skewness(&returns),
        }
    }
}
