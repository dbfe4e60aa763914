use super::{Direction, MarketEvent, SignalEvent};

///Generates signals from market events.
///
///Implementations must never fail on insufficient history: until `warm_up` bars have been
///seen, the generator emits [Direction::Flat] signals rather than erroring. Returning [None]
///means "no opinion this bar", which leaves the current position untouched.
pub trait SignalGenerator {
    ///Bars consumed before the first directional signal can be emitted.
    fn warm_up(&self) -> usize {
        0
    }

    fn on_market(&mut self, event: &MarketEvent) -> Option<SignalEvent>;
}

///Signals the sign of the previous completed period's log-return.
///
///At bar t the direction is `sign(ln(p[t-1] / p[t-2]))`, so the first two bars are flat. An
///optional threshold suppresses the signal entirely for moves smaller than `threshold` in
///absolute log-return terms, which cuts turnover on quiet days.
#[derive(Debug)]
pub struct MomentumSignal {
    threshold: f64,
    last_price: Option<f64>,
    last_return: Option<f64>,
}

impl MomentumSignal {
    pub fn new() -> Self {
        Self::with_threshold(0.0)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            last_price: None,
            last_return: None,
        }
    }
}

impl Default for MomentumSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalGenerator for MomentumSignal {
    fn warm_up(&self) -> usize {
        2
    }

    fn on_market(&mut self, event: &MarketEvent) -> Option<SignalEvent> {
        let direction = match self.last_return {
            None => Some(Direction::Flat),
            Some(ret) if ret.abs() < self.threshold => None,
            Some(ret) => Some(Direction::from_sign(ret)),
        };

        if let Some(last_price) = self.last_price {
            self.last_return = Some((event.price / last_price).ln());
        }
        self.last_price = Some(event.price);

        direction.map(|direction| SignalEvent {
            date: event.date,
            direction,
        })
    }
}
