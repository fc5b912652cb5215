//! In-memory bar source for tests and offline runs.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use super::provider::{Interval, RawBar, RawBarSource, RawBarStream, SourceError};
use crate::domain::Symbol;

#[derive(Debug, Clone, Default)]
struct Feed {
    bars: Vec<RawBar>,
    /// Error yielded once `bars` is exhausted.
    trailing_error: Option<SourceError>,
    open_error: Option<SourceError>,
}

/// Bar source backed by per-symbol vectors.
///
/// Symbols without a registered feed produce an empty stream, the same as a
/// remote feed answering for an unknown ticker.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    feeds: HashMap<Symbol, Feed>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bars` for `symbol`.
    pub fn with_bars(mut self, symbol: &Symbol, bars: Vec<RawBar>) -> Self {
        self.feeds.entry(symbol.clone()).or_default().bars = bars;
        self
    }

    /// Serve `bars` for `symbol`, then fail mid-stream with `error`.
    pub fn with_failure_after(
        mut self,
        symbol: &Symbol,
        bars: Vec<RawBar>,
        error: SourceError,
    ) -> Self {
        let feed = self.feeds.entry(symbol.clone()).or_default();
        feed.bars = bars;
        feed.trailing_error = Some(error);
        self
    }

    /// Refuse to open a stream for `symbol` at all.
    pub fn with_open_error(mut self, symbol: &Symbol, error: SourceError) -> Self {
        self.feeds.entry(symbol.clone()).or_default().open_error = Some(error);
        self
    }
}

impl RawBarSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn open(&self, symbol: &Symbol, _interval: Interval) -> Result<RawBarStream, SourceError> {
        let Some(feed) = self.feeds.get(symbol) else {
            return Ok(Box::new(std::iter::empty()));
        };
        if let Some(err) = &feed.open_error {
            return Err(err.clone());
        }
        let bars = feed.bars.clone().into_iter().map(Ok);
        let tail = feed.trailing_error.clone().into_iter().map(Err);
        Ok(Box::new(bars.chain(tail)))
    }
}

/// Consecutive calendar-day bars starting at `start`, stamped 14:30 UTC
/// (the US market open, which is where daily feeds put their timestamps).
pub fn daily_bars(start: NaiveDate, closes: &[&str]) -> Vec<RawBar> {
    closes
        .iter()
        .enumerate()
        .filter_map(|(i, close)| {
            let date = start.checked_add_days(Days::new(i as u64))?;
            let ts = date.and_hms_opt(14, 30, 0)?.and_utc().timestamp();
            Some(RawBar::new(ts, *close))
        })
        .collect()
}
