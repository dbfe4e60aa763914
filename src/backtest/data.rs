use crate::input::{Bar, BarSeries};

use super::MarketEvent;

///Replays a preloaded bar series as market events.
///
///The stream is lazy, finite, and non-restartable: once a bar has been emitted it is gone, and
///when the underlying series is exhausted the backtest ends. No filtering or gap handling
///happens here beyond what the input data provides.
#[derive(Debug)]
pub struct BarStream {
    symbol: String,
    bars: std::vec::IntoIter<Bar>,
}

impl BarStream {
    pub fn from_series(series: BarSeries) -> Self {
        let symbol = series.symbol().to_string();
        Self {
            symbol,
            bars: series.into_bars().into_iter(),
        }
    }

    pub fn from_bars(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: bars.into_iter(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn next_event(&mut self) -> Option<MarketEvent> {
        self.bars.next().map(|bar| MarketEvent {
            date: bar.date,
            price: bar.price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::BarStream;
    use crate::input::Bar;

    #[test]
    fn test_that_stream_emits_bars_in_order_then_ends() {
        let bars = vec![
            Bar {
                date: 100.into(),
                price: 101.0,
            },
            Bar {
                date: 101.into(),
                price: 102.0,
            },
        ];
        let mut stream = BarStream::from_bars("ABC", bars);

        assert_eq!(stream.next_event().unwrap().price, 101.0);
        assert_eq!(stream.next_event().unwrap().price, 102.0);
        assert!(stream.next_event().is_none());
        //Exhausted streams stay exhausted
        assert!(stream.next_event().is_none());
    }
}
