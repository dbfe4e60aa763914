//! Synthetic tick feed served and consumed over HTTP/JSON.
//!
//! [TickFeed] generates an arithmetic random walk one tick at a time and keeps every tick in
//! an append-only in-memory log. The [server] module exposes the feed through an actix-web
//! app; subscribers poll [server::history] with the index of the last tick they have seen, so
//! a dropped poll just re-reads from the same cursor. There is deliberately no backpressure,
//! versioning, or recovery here.

pub mod client;
pub mod server;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

//Shocks can walk the price down but never through zero
const PRICE_FLOOR: f64 = 0.1;

///One tick message: epoch milliseconds, instrument, last price.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Tick {
    pub time: i64,
    pub symbol: String,
    pub price: f64,
}

///Generates synthetic ticks and records them in arrival order.
#[derive(Debug)]
pub struct TickFeed {
    symbol: String,
    price: f64,
    dist: Normal<f64>,
    rng: StdRng,
    next_time: i64,
    interval_ms: i64,
    history: Vec<Tick>,
}

impl TickFeed {
    pub fn new(
        symbol: impl Into<String>,
        start_price: f64,
        sigma: f64,
        start_time_ms: i64,
        interval_ms: i64,
        seed: u64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price: start_price,
            //A negative sigma is a configuration error, not a data error
            dist: Normal::new(0.0, sigma).unwrap(),
            rng: StdRng::seed_from_u64(seed),
            next_time: start_time_ms,
            interval_ms,
            history: Vec::new(),
        }
    }

    ///Advance the walk by one step and append the resulting tick to the log.
    pub fn tick(&mut self) -> Tick {
        let shock = self.dist.sample(&mut self.rng);
        self.price = (self.price + shock).max(PRICE_FLOOR);

        let tick = Tick {
            time: self.next_time,
            symbol: self.symbol.clone(),
            price: self.price,
        };
        self.next_time += self.interval_ms;
        self.history.push(tick.clone());
        tick
    }

    pub fn latest(&self) -> Option<&Tick> {
        self.history.last()
    }

    ///All ticks from index `from` onwards; an out-of-range index reads as empty rather than
    ///erroring so a slow subscriber can always catch up.
    pub fn history_from(&self, from: usize) -> &[Tick] {
        let from = from.min(self.history.len());
        &self.history[from..]
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

#[cfg(test)]
mod tests {
    use super::TickFeed;

    fn setup() -> TickFeed {
        TickFeed::new("EURUSD", 1.10, 0.0005, 1_000, 100, 42)
    }

    #[test]
    fn test_that_tick_times_advance_by_the_interval() {
        let mut feed = setup();
        let first = feed.tick();
        let second = feed.tick();
        assert_eq!(first.time, 1_000);
        assert_eq!(second.time, 1_100);
    }

    #[test]
    fn test_that_price_never_goes_through_the_floor() {
        //Enormous sigma forces the walk against the floor almost immediately
        let mut feed = TickFeed::new("EURUSD", 1.10, 10.0, 0, 100, 42);
        for _ in 0..100 {
            feed.tick();
        }
        assert!(feed.history_from(0).iter().all(|tick| tick.price >= 0.1));
    }

    #[test]
    fn test_that_history_cursor_reads_only_new_ticks() {
        let mut feed = setup();
        for _ in 0..5 {
            feed.tick();
        }
        assert_eq!(feed.history_from(0).len(), 5);
        assert_eq!(feed.history_from(3).len(), 2);
        //Past the end is an empty read, not an error
        assert!(feed.history_from(10).is_empty());
    }

    #[test]
    fn test_that_same_seed_reproduces_the_walk() {
        let mut first = setup();
        let mut second = setup();
        for _ in 0..10 {
            first.tick();
            second.tick();
        }
        let first_prices: Vec<f64> = first.history_from(0).iter().map(|tick| tick.price).collect();
        let second_prices: Vec<f64> =
            second.history_from(0).iter().map(|tick| tick.price).collect();
        assert_eq!(first_prices, second_prices);
    }
}
