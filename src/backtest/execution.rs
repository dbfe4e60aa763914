use super::{BacktestError, FillEvent, MarketEvent, OrderEvent};

///Fills orders immediately at the most recent market price.
///
///Zero slippage, zero transaction cost, no partial fills. The simulator watches market events
///itself so the fill price is always the price of the bar being processed, never a price the
///order happened to carry.
#[derive(Debug, Default)]
pub struct InstantExecution {
    last_price: Option<f64>,
}

impl InstantExecution {
    pub fn new() -> Self {
        Self { last_price: None }
    }

    pub fn on_market(&mut self, event: &MarketEvent) {
        self.last_price = Some(event.price);
    }

    pub fn on_order(&self, event: &OrderEvent) -> Result<FillEvent, BacktestError> {
        let fill_price = self.last_price.ok_or(BacktestError::OrderBeforeMarket)?;
        Ok(FillEvent {
            date: event.date,
            direction: event.direction,
            quantity: event.quantity,
            fill_price,
        })
    }
}
