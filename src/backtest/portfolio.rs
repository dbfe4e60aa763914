use serde::{Deserialize, Serialize};

use crate::clock::DateTime;

use super::{FillEvent, MarketEvent, OrderEvent, SignalEvent};

///One mark-to-market observation on the equity curve.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct EquityPoint {
    pub date: DateTime,
    pub equity: f64,
}

///Tracks position, cash, and the equity curve for a single-instrument strategy.
///
///Signals are translated into delta orders against a fixed unit size; position and cash only
///change when a fill arrives. Equity is marked once per bar (cash + position * price) starting
///after the strategy warm-up, so the curve has one point per bar net of warm-up. No margin
///checks and no risk limits.
#[derive(Clone, Debug)]
pub struct Portfolio {
    initial_cash: f64,
    cash: f64,
    position: f64,
    unit_size: f64,
    latest_price: Option<f64>,
    warm_up: usize,
    bars_seen: usize,
    equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(initial_cash: f64, unit_size: f64, warm_up: usize) -> Self {
        Self {
            initial_cash,
            cash: initial_cash,
            position: 0.0,
            unit_size,
            latest_price: None,
            warm_up,
            bars_seen: 0,
            equity_curve: Vec::new(),
        }
    }

    pub fn with_initial_cash(mut self, cash: f64) -> Self {
        self.initial_cash = cash;
        self.cash = cash;
        self
    }

    pub fn with_unit_size(mut self, unit_size: f64) -> Self {
        self.unit_size = unit_size;
        self
    }

    pub fn on_market(&mut self, event: &MarketEvent) {
        self.latest_price = Some(event.price);
        if self.bars_seen >= self.warm_up {
            self.equity_curve.push(EquityPoint {
                date: event.date,
                equity: self.cash + self.position * event.price,
            });
        }
        self.bars_seen += 1;
    }

    ///Translate a signal into the order that moves the position to the signalled target.
    ///Returns [None] when the position is already there.
    pub fn on_signal(&mut self, event: &SignalEvent) -> Option<OrderEvent> {
        self.latest_price?;
        let target = event.direction.sign() * self.unit_size;
        let quantity = target - self.position;
        if quantity == 0.0 {
            return None;
        }
        Some(OrderEvent {
            date: event.date,
            direction: event.direction,
            quantity,
        })
    }

    pub fn on_fill(&mut self, event: &FillEvent) {
        self.position += event.quantity;
        self.cash -= event.quantity * event.fill_price;
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    pub fn into_equity_curve(self) -> Vec<EquityPoint> {
        self.equity_curve
    }
}
