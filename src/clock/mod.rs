//! Synchronizes time across components

use std::ops::Deref;
use std::sync::{Arc, Mutex};
use std::vec::IntoIter;

use serde::{Deserialize, Serialize};
use time::{format_description, Date};

///The frequency of a process.
#[derive(Clone, Debug)]
pub enum Frequency {
    Second,
    Daily,
    Fixed,
}

///[DateTime] is a wrapper around the epoch time as i64. Bars, ticks, and the equity curve all
///stamp time through this type so the internal representation can change without touching
///clients.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct DateTime(i64);

impl DateTime {
    ///Parse a date string such as `2020-01-03` into the epoch second of that day's UTC midnight.
    ///Returns [None] when the string does not match the format.
    pub fn from_date_string(val: &str, date_fmt: &str) -> Option<Self> {
        let format = format_description::parse(date_fmt).ok()?;
        let parsed_date = Date::parse(val, &format).ok()?;
        let parsed_time = parsed_date.with_time(time::macros::time!(00:00));
        Some(Self::from(parsed_time.assume_utc().unix_timestamp()))
    }
}

impl Deref for DateTime {
    type Target = i64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<DateTime> for i64 {
    fn from(v: DateTime) -> Self {
        v.0
    }
}

impl From<i64> for DateTime {
    fn from(v: i64) -> Self {
        DateTime(v)
    }
}

#[doc(hidden)]
#[derive(Debug)]
pub struct ClockInner {
    //We have a position and Vec because we should be able to return an iterator without changing
    //the state of the Clock
    pos: usize,
    dates: Vec<DateTime>,
}

/// Used to synchronize time between components.
///
/// [Clock] is thread-safe and wrapped in [Arc] so can be cheaply cloned and references held across
/// the application.
#[derive(Debug)]
pub struct Clock {
    inner: Arc<Mutex<ClockInner>>,
    frequency: Frequency,
}

impl Clone for Clock {
    fn clone(&self) -> Self {
        Clock {
            inner: Arc::clone(&self.inner),
            frequency: self.frequency.clone(),
        }
    }
}

impl Clock {
    pub fn now(&self) -> DateTime {
        let inner = self.inner.lock().unwrap();
        //This cannot trigger an error because the error will be thrown when the client ticks to an
        //invalid position
        *inner.dates.get(inner.pos).unwrap()
    }

    pub fn has_next(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.pos < inner.dates.len() - 1
    }

    pub fn tick(&mut self) {
        let mut inner_mut = self.inner.lock().unwrap();
        inner_mut.pos += 1;
        if inner_mut.pos == inner_mut.dates.len() {
            panic!("Client has ticked past the number of dates");
        }
    }

    // Doesn't change the iteration state, used for clients to setup data using clock
    pub fn peek(&self) -> IntoIter<DateTime> {
        let inner = self.inner.lock().unwrap();
        inner.dates.clone().into_iter()
    }

    /// Get length of clock
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.dates.len()
    }

    pub fn frequency(&self) -> &Frequency {
        &self.frequency
    }

    /// Check to see if dates are empty
    pub fn is_empty(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.dates.is_empty()
    }

    pub fn new(dates: Vec<DateTime>, frequency: Frequency) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ClockInner { dates, pos: 0 })),
            frequency,
        }
    }
}

pub struct ClockBuilder {
    pub start: DateTime,
    pub end: DateTime,
    pub dates: Vec<DateTime>,
    pub frequency: Frequency,
}

impl ClockBuilder {
    const SECS_IN_DAY: i64 = 86_400;

    pub fn build(self) -> Clock {
        Clock::new(self.dates, self.frequency)
    }

    pub fn with_frequency(&self, freq: &Frequency) -> Self {
        match freq {
            Frequency::Daily => {
                let dates: Vec<DateTime> = (i64::from(self.start)
                    ..i64::from(self.end) + ClockBuilder::SECS_IN_DAY)
                    .step_by(ClockBuilder::SECS_IN_DAY as usize)
                    .map(DateTime::from)
                    .collect();
                Self {
                    start: self.start,
                    end: self.end,
                    dates,
                    frequency: Frequency::Daily,
                }
            }
            Frequency::Second => {
                let dates: Vec<DateTime> = (i64::from(self.start)..i64::from(self.end) + 1)
                    .map(DateTime::from)
                    .collect();
                Self {
                    start: self.start,
                    end: self.end,
                    dates,
                    frequency: Frequency::Second,
                }
            }
            _ => panic!("Clock frequencies apart from Daily/Second are not supported"),
        }
    }

    //Runs for length given + 1 period
    pub fn with_length_in_seconds(start: impl Into<DateTime>, length_in_seconds: i64) -> Self {
        let start_val = start.into();
        let end = DateTime::from(*start_val + length_in_seconds);
        Self {
            start: start_val,
            end,
            dates: Vec::new(),
            frequency: Frequency::Fixed,
        }
    }

    //Runs for length given + 1 period
    pub fn with_length_in_days(start: impl Into<DateTime>, length_in_days: i64) -> Self {
        let start_val = start.into();
        let end = DateTime::from(*start_val + (length_in_days * ClockBuilder::SECS_IN_DAY));
        Self {
            start: start_val,
            end,
            dates: Vec::new(),
            frequency: Frequency::Fixed,
        }
    }
}
