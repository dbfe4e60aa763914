//! Minimal event-driven backtest for a single instrument.
//!
//! Four roles cooperate through one ordered event queue: [data::BarStream] replays historical
//! bars as market events, a [strategy::SignalGenerator] turns market events into directional
//! signals, [portfolio::Portfolio] turns signals into orders and applies fills, and
//! [execution::InstantExecution] turns orders into fills at the last observed price.
//!
//! Control flows one direction per bar: market -> signal -> order -> fill. The queue is drained
//! to exhaustion before the next bar is introduced, so events for a given date are fully
//! processed before time advances. The whole simulation is synchronous and in-process; the only
//! mutable state is owned by the portfolio.

pub mod data;
pub mod execution;
pub mod portfolio;
pub mod strategy;

use std::collections::VecDeque;

use derive_more::{Display, Error};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::clock::DateTime;
use crate::input::BarSeries;
use data::BarStream;
use execution::InstantExecution;
use portfolio::{EquityPoint, Portfolio};
use strategy::SignalGenerator;

///Direction of a signal, order, or fill.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Direction {
    Long,
    Short,
    Flat,
}

impl Direction {
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
            Direction::Flat => 0.0,
        }
    }

    pub fn from_sign(val: f64) -> Self {
        if val > 0.0 {
            Direction::Long
        } else if val < 0.0 {
            Direction::Short
        } else {
            Direction::Flat
        }
    }
}

///A new bar for the instrument under simulation.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct MarketEvent {
    pub date: DateTime,
    pub price: f64,
}

///A directional signal produced by the strategy.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct SignalEvent {
    pub date: DateTime,
    pub direction: Direction,
}

///An order to move the position to the signalled target. `quantity` is the signed change in
///units required to reach it.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct OrderEvent {
    pub date: DateTime,
    pub direction: Direction,
    pub quantity: f64,
}

///The immediate execution of an order.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct FillEvent {
    pub date: DateTime,
    pub direction: Direction,
    pub quantity: f64,
    pub fill_price: f64,
}

#[derive(Clone, Copy, Debug)]
pub enum Event {
    Market(MarketEvent),
    Signal(SignalEvent),
    Order(OrderEvent),
    Fill(FillEvent),
}

///Malformed input aborts the run. This is an offline deterministic simulation so there is no
///retry or partial-failure path.
#[derive(Debug, Display, Error)]
pub enum BacktestError {
    EmptySeries,
    NonMonotonicDate,
    OrderBeforeMarket,
}

///Everything a caller needs after a run: the equity curve, every fill, and the terminal
///portfolio state. The portfolio itself is discarded with the engine.
#[derive(Clone, Debug, Serialize)]
pub struct BacktestReport {
    pub symbol: String,
    pub bars: usize,
    pub equity_curve: Vec<EquityPoint>,
    pub fills: Vec<FillEvent>,
    pub final_position: f64,
    pub final_cash: f64,
}

impl BacktestReport {
    pub fn equity_values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|point| point.equity).collect()
    }
}

///Coordinates the four roles around one event queue.
pub struct EventBacktest<S: SignalGenerator> {
    data: BarStream,
    strategy: S,
    portfolio: Portfolio,
    execution: InstantExecution,
    events: VecDeque<Event>,
    last_date: Option<DateTime>,
}

impl<S: SignalGenerator> EventBacktest<S> {
    pub fn new(series: BarSeries, strategy: S) -> Self {
        let warm_up = strategy.warm_up();
        Self {
            data: BarStream::from_series(series),
            strategy,
            portfolio: Portfolio::new(1.0, 1.0, warm_up),
            execution: InstantExecution::new(),
            events: VecDeque::new(),
            last_date: None,
        }
    }

    pub fn from_stream(data: BarStream, strategy: S) -> Self {
        let warm_up = strategy.warm_up();
        Self {
            data,
            strategy,
            portfolio: Portfolio::new(1.0, 1.0, warm_up),
            execution: InstantExecution::new(),
            events: VecDeque::new(),
            last_date: None,
        }
    }

    pub fn with_initial_cash(mut self, cash: f64) -> Self {
        self.portfolio = self.portfolio.with_initial_cash(cash);
        self
    }

    pub fn with_unit_size(mut self, unit_size: f64) -> Self {
        self.portfolio = self.portfolio.with_unit_size(unit_size);
        self
    }

    ///Main event loop: one market event per bar, then the queue is drained to exhaustion
    ///before the next bar is pulled.
    pub fn run(mut self) -> Result<BacktestReport, BacktestError> {
        let mut bars = 0;
        let mut fills = Vec::new();

        while let Some(market) = self.data.next_event() {
            if let Some(last) = self.last_date {
                if market.date <= last {
                    return Err(BacktestError::NonMonotonicDate);
                }
            }
            self.last_date = Some(market.date);
            bars += 1;
            self.events.push_back(Event::Market(market));

            while let Some(event) = self.events.pop_front() {
                match event {
                    Event::Market(market) => {
                        self.portfolio.on_market(&market);
                        self.execution.on_market(&market);
                        if let Some(signal) = self.strategy.on_market(&market) {
                            self.events.push_back(Event::Signal(signal));
                        }
                    }
                    Event::Signal(signal) => {
                        if let Some(order) = self.portfolio.on_signal(&signal) {
                            self.events.push_back(Event::Order(order));
                        }
                    }
                    Event::Order(order) => {
                        let fill = self.execution.on_order(&order)?;
                        self.events.push_back(Event::Fill(fill));
                    }
                    Event::Fill(fill) => {
                        debug!(
                            "fill {:?} {} units at {} on {}",
                            fill.direction,
                            fill.quantity,
                            fill.fill_price,
                            i64::from(fill.date)
                        );
                        self.portfolio.on_fill(&fill);
                        fills.push(fill);
                    }
                }
            }
        }

        if bars == 0 {
            return Err(BacktestError::EmptySeries);
        }

        Ok(BacktestReport {
            symbol: self.data.symbol().to_string(),
            bars,
            final_position: self.portfolio.position(),
            final_cash: self.portfolio.cash(),
            equity_curve: self.portfolio.into_equity_curve(),
            fills,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::data::BarStream;
    use super::strategy::MomentumSignal;
    use super::{BacktestError, Direction, EventBacktest};
    use crate::input::{random_walk_series, Bar, BarSeriesBuilder};

    fn series_from_prices(prices: &[f64]) -> crate::input::BarSeries {
        let mut builder = BarSeriesBuilder::new("ABC");
        for (offset, price) in prices.iter().enumerate() {
            builder.add_bar(*price, (offset as i64 + 1) * 86_400);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_that_constant_series_stays_flat_with_constant_equity() {
        let series = series_from_prices(&[100.0; 50]);
        let report = EventBacktest::new(series, MomentumSignal::new())
            .run()
            .unwrap();

        assert!(report.fills.is_empty());
        assert_eq!(report.final_position, 0.0);
        assert!(report
            .equity_values()
            .iter()
            .all(|equity| *equity == 1.0));
    }

    #[test]
    fn test_that_rising_series_goes_long_with_nondecreasing_equity() {
        let prices: Vec<f64> = (0..50).map(|step| 100.0 + step as f64).collect();
        let series = series_from_prices(&prices);
        let report = EventBacktest::new(series, MomentumSignal::new())
            .run()
            .unwrap();

        //Two warm-up bars then one entry fill; the position never turns over afterwards
        assert_eq!(report.fills.len(), 1);
        assert_eq!(report.fills[0].direction, Direction::Long);
        assert_eq!(report.final_position, 1.0);

        let equity = report.equity_values();
        assert!(equity.windows(2).all(|pair| pair[1] >= pair[0]));
    }

    #[test]
    fn test_that_equity_curve_length_is_bars_minus_warm_up() {
        let series = random_walk_series("ABC", 86_400, 99, 100.0, 0.0, 0.01, 7);
        let bars = series.len();
        let report = EventBacktest::new(series, MomentumSignal::new())
            .run()
            .unwrap();
        assert_eq!(report.bars, bars);
        assert_eq!(report.equity_curve.len(), bars - 2);
    }

    #[test]
    fn test_that_same_input_produces_identical_equity_curve() {
        let series = random_walk_series("ABC", 86_400, 252, 100.0, 0.0005, 0.02, 42);
        let first = EventBacktest::new(series.clone(), MomentumSignal::new())
            .run()
            .unwrap();
        let second = EventBacktest::new(series, MomentumSignal::new())
            .run()
            .unwrap();
        assert_eq!(first.equity_values(), second.equity_values());
        assert_eq!(first.fills.len(), second.fills.len());
    }

    #[test]
    fn test_that_fills_do_not_move_marked_equity() {
        //A fill trades cash for position at the mark price, so equity before and after the
        //first trade must match the warm-up equity exactly
        let prices = vec![100.0, 101.0, 102.0, 103.0];
        let series = series_from_prices(&prices);
        let report = EventBacktest::new(series, MomentumSignal::new())
            .run()
            .unwrap();
        assert_eq!(report.equity_curve.first().unwrap().equity, 1.0);
    }

    #[test]
    fn test_that_non_monotonic_dates_abort_the_run() {
        let bars = vec![
            Bar {
                date: 100.into(),
                price: 100.0,
            },
            Bar {
                date: 100.into(),
                price: 101.0,
            },
        ];
        let stream = BarStream::from_bars("ABC", bars);
        let result = EventBacktest::from_stream(stream, MomentumSignal::new()).run();
        assert!(matches!(result, Err(BacktestError::NonMonotonicDate)));
    }

    #[test]
    fn test_that_empty_stream_aborts_the_run() {
        let stream = BarStream::from_bars("ABC", Vec::new());
        let result = EventBacktest::from_stream(stream, MomentumSignal::new()).run();
        assert!(matches!(result, Err(BacktestError::EmptySeries)));
    }

    #[test]
    fn test_that_direction_reverses_position_with_double_sized_fill() {
        //Up move then down move: +1 entry then a -2 reversal
        let prices = vec![100.0, 100.0, 102.0, 101.0, 101.0];
        let series = series_from_prices(&prices);
        let report = EventBacktest::new(series, MomentumSignal::new())
            .run()
            .unwrap();

        let quantities: Vec<f64> = report.fills.iter().map(|fill| fill.quantity).collect();
        assert_eq!(quantities, vec![1.0, -2.0]);
        assert_eq!(report.final_position, -1.0);
    }
}
