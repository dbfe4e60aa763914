//! # What is Ticklab?
//!
//! Ticklab is a library for small single-instrument trading experiments: backtesting a
//! strategy bar by bar, checking whether a return series is predictable at all, and streaming
//! synthetic ticks to subscribers. Each piece is usable on its own and the binaries show the
//! intended wiring.
//!
//! # Implementation
//!
//! The library is split along the lifecycle of an experiment:
//! - An input layer, [BarSeries](crate::input::BarSeries), which loads a validated,
//!   time-ordered price series from CSV (local or remote) or generates one as a seeded random
//!   walk. Bad data is fatal here, before any simulation starts.
//! - The event backtester in [backtest](crate::backtest): data handler, signal generator,
//!   portfolio, and execution simulator connected by one ordered event queue that is drained
//!   to exhaustion before time advances. Single-threaded and deterministic by construction.
//! - The vectorized backtester in [vecback](crate::vecback), which answers the same question
//!   as the event loop for linear models in one pass over arrays, with proportional
//!   transaction costs applied to turnover.
//! - Research statistics in [stats](crate::stats): OLS through the normal equations,
//!   seeded random-walk and AR(1) simulation, and autocorrelation diagnostics.
//! - Equity-curve metrics in [perf](crate::perf), shared by both backtesters.
//! - The tick feed in [ticker](crate::ticker): an append-only synthetic tick log behind an
//!   actix-web app, with a polling cursor instead of a push socket so subscribers can always
//!   catch up after a dropped poll.
//!
//! Binaries: `event_backtest` and `vec_backtest` run the two backtesters over a CSV file,
//! `tick_server` serves the feed, `tick_print` and `tick_collector` subscribe to it.

pub mod backtest;
pub mod clock;
pub mod input;
pub mod perf;
pub mod stats;
pub mod ticker;
pub mod vecback;
