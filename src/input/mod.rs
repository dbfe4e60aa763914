//! Bar series used as the data source for backtests.
//!
//! A [BarSeries] is a time-ordered sequence of single-instrument price bars, immutable once
//! built. Series can be built by hand through [BarSeriesBuilder], loaded from a CSV file with a
//! `Date` column and one named price column, fetched over HTTPS when no local file exists, or
//! generated as a seeded geometric random walk.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::clock::{ClockBuilder, DateTime, Frequency};

const DATE_COLUMN: &str = "Date";
const DATE_FORMAT: &str = "[year]-[month]-[day]";

///One discrete time-stamped price observation.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Bar {
    pub date: DateTime,
    pub price: f64,
}

///Time-ordered bars for a single instrument. Dates are strictly increasing, which is checked
///once at build time so downstream consumers never have to re-validate ordering.
#[derive(Clone, Debug)]
pub struct BarSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.price).collect()
    }

    pub fn dates(&self) -> Vec<DateTime> {
        self.bars.iter().map(|bar| bar.date).collect()
    }

    ///Log-returns between consecutive bars, one element shorter than the series.
    pub fn log_returns(&self) -> Vec<f64> {
        self.bars
            .windows(2)
            .map(|pair| (pair[1].price / pair[0].price).ln())
            .collect()
    }
}

pub struct BarSeriesBuilder {
    symbol: String,
    bars: Vec<Bar>,
}

impl BarSeriesBuilder {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    pub fn add_bar(&mut self, price: f64, date: impl Into<DateTime>) {
        self.bars.push(Bar {
            date: date.into(),
            price,
        });
    }

    ///Bad data is fatal at build time: an empty series, a non-positive price, or dates that do
    ///not strictly increase abort the run here rather than part-way through a simulation.
    pub fn build(self) -> Result<BarSeries> {
        if self.bars.is_empty() {
            return Err(anyhow!("bar series {} is empty", self.symbol));
        }
        for pair in self.bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(anyhow!(
                    "bar series {} has non-monotonic dates at {}",
                    self.symbol,
                    i64::from(pair[1].date)
                ));
            }
        }
        if let Some(bar) = self.bars.iter().find(|bar| !(bar.price > 0.0)) {
            return Err(anyhow!(
                "bar series {} has non-positive price at {}",
                self.symbol,
                i64::from(bar.date)
            ));
        }
        Ok(BarSeries {
            symbol: self.symbol,
            bars: self.bars,
        })
    }
}

///Parse a CSV stream with a `Date` column and one price column per instrument into a
///[BarSeries] for the named column. Rows where the column is empty are skipped, any other
///malformed row is fatal.
pub fn from_csv_reader<R: Read>(reader: R, column: &str) -> Result<BarSeries> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .context("csv input has no header row")?
        .clone();

    let date_pos = headers
        .iter()
        .position(|name| name == DATE_COLUMN)
        .ok_or_else(|| anyhow!("csv input has no {DATE_COLUMN} column"))?;
    let price_pos = headers
        .iter()
        .position(|name| name == column)
        .ok_or_else(|| anyhow!("csv input has no {column} column"))?;

    let mut builder = BarSeriesBuilder::new(column);
    for (line, record) in rdr.records().enumerate() {
        let record = record.context("csv input has a malformed row")?;
        let date_field = &record[date_pos];
        let price_field = &record[price_pos];
        if price_field.is_empty() {
            continue;
        }
        let date = DateTime::from_date_string(date_field, DATE_FORMAT)
            .ok_or_else(|| anyhow!("bad date {date_field} on row {}", line + 1))?;
        let price: f64 = price_field
            .parse()
            .with_context(|| format!("bad price {price_field} on row {}", line + 1))?;
        builder.add_bar(price, date);
    }
    builder.build()
}

pub fn from_csv_path(path: impl AsRef<Path>, column: &str) -> Result<BarSeries> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("could not open {}", path.as_ref().display()))?;
    from_csv_reader(file, column)
}

///Fetch a CSV over HTTPS and parse it like [from_csv_path]. Blocking, so only suitable for
///setup before a simulation starts.
pub fn from_remote_csv(url: &str, column: &str) -> Result<BarSeries> {
    let body = reqwest::blocking::get(url)
        .and_then(|resp| resp.text())
        .with_context(|| format!("could not fetch {url}"))?;
    from_csv_reader(body.as_bytes(), column)
}

///Load from a local file when present, otherwise fall back to the remote copy.
pub fn load_or_fetch(path: impl AsRef<Path>, url: &str, column: &str) -> Result<BarSeries> {
    if path.as_ref().is_file() {
        from_csv_path(path, column)
    } else {
        info!(
            "local data file {} not found, loading from {}",
            path.as_ref().display(),
            url
        );
        from_remote_csv(url, column)
    }
}

///Generate a daily geometric random-walk series: log-returns are drawn from N(mu, sigma) and
///compounded from `start_price`. Seeded so the same arguments always produce the same series.
pub fn random_walk_series(
    symbol: impl Into<String>,
    start: impl Into<DateTime>,
    days: i64,
    start_price: f64,
    mu: f64,
    sigma: f64,
    seed: u64,
) -> BarSeries {
    let clock = ClockBuilder::with_length_in_days(start, days)
        .with_frequency(&Frequency::Daily)
        .build();
    let mut rng = StdRng::seed_from_u64(seed);
    //A negative sigma is a configuration error, not a data error
    let dist = Normal::new(mu, sigma).unwrap();

    let mut price = start_price;
    let mut bars = Vec::new();
    for date in clock.peek() {
        bars.push(Bar { date, price });
        price *= f64::exp(dist.sample(&mut rng));
    }
    BarSeries {
        symbol: symbol.into(),
        bars,
    }
}
