//! Vectorized lagged-returns backtest.
//!
//! The whole strategy is computed in one pass over arrays instead of an event loop: build a
//! design matrix of lagged log-returns, fit OLS, take the position as the sign of the one-step
//! ahead forecast, and deduct a proportional transaction cost per unit of turnover after the
//! fact. The in-sample fit is deliberate; this is a research tool for asking whether lagged
//! returns carry any signal at all, not a live trading rule.

use anyhow::{bail, Result};
use ndarray::{Array1, Array2};

use crate::backtest::Direction;
use crate::clock::DateTime;
use crate::input::BarSeries;
use crate::stats::ols::LinearRegression;

///Build the lagged design matrix and target from a return series. Row t of the matrix holds
///`[r[t-1], r[t-2], ..., r[t-lags]]` and the target is `r[t]`.
pub fn lagged_returns(returns: &[f64], lags: usize) -> Result<(Array2<f64>, Array1<f64>)> {
    let n = returns.len();
    if lags == 0 {
        bail!("need at least one lag");
    }
    if n <= lags {
        bail!("need more than {lags} return observations to build {lags} lags");
    }

    let rows = n - lags;
    let mut design = Array2::zeros((rows, lags));
    for row in 0..rows {
        for lag in 0..lags {
            design[[row, lag]] = returns[lags + row - (lag + 1)];
        }
    }
    let target = Array1::from_vec(returns[lags..].to_vec());
    Ok((design, target))
}

#[derive(Clone, Debug)]
pub struct VecBacktestResult {
    ///Dates aligned with the target returns, one per row of the design matrix.
    pub dates: Vec<DateTime>,
    ///Position held over each period: -1, 0, or +1.
    pub positions: Vec<f64>,
    ///Realized market log-returns over the evaluation window.
    pub market_returns: Vec<f64>,
    ///Strategy returns net of transaction costs.
    pub strategy_returns: Vec<f64>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub r_squared: f64,
}

impl VecBacktestResult {
    pub fn strategy_equity(&self) -> Vec<f64> {
        cumulative_equity(&self.strategy_returns)
    }

    pub fn market_equity(&self) -> Vec<f64> {
        cumulative_equity(&self.market_returns)
    }
}

fn cumulative_equity(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |equity, ret| {
            *equity *= 1.0 + ret;
            Some(*equity)
        })
        .collect()
}

///Run the lagged-returns OLS strategy over a bar series.
///
///`cost` is the proportional transaction cost per unit of turnover, e.g. `0.0001` charges one
///basis point for each unit traded. Costs start at the second evaluated period because the
///opening trade of the window is not observable from positions alone.
pub fn run_lag_ols(series: &BarSeries, lags: usize, cost: f64) -> Result<VecBacktestResult> {
    let returns = series.log_returns();
    let (design, target) = lagged_returns(&returns, lags)?;

    let mut model = LinearRegression::new();
    model.fit(&design, &target)?;
    let predicted = model.predict(&design)?;

    let positions: Vec<f64> = predicted
        .iter()
        .map(|forecast| Direction::from_sign(*forecast).sign())
        .collect();

    let mut strategy_returns: Vec<f64> = positions
        .iter()
        .zip(target.iter())
        .map(|(position, ret)| position * ret)
        .collect();
    for period in 1..strategy_returns.len() {
        let turnover = (positions[period] - positions[period - 1]).abs();
        strategy_returns[period] -= cost * turnover;
    }

    //Returns start one bar into the series and the first `lags` of them are consumed by the
    //design matrix, so the evaluation window starts at bar lags + 1
    let dates = series.dates()[lags + 1..].to_vec();

    //Fit succeeded so all model accessors are populated
    Ok(VecBacktestResult {
        dates,
        positions,
        market_returns: target.to_vec(),
        strategy_returns,
        intercept: model.intercept().unwrap_or(0.0),
        coefficients: model
            .coefficients()
            .map(|coefficients| coefficients.to_vec())
            .unwrap_or_default(),
        r_squared: model.r_squared().unwrap_or(f64::NAN),
    })
}
