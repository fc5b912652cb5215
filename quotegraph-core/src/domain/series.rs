//! PricePoint and Series: the normalized daily close history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Symbol;
use crate::error::QuoteError;

/// One day's closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Non-empty, date-ordered close history for one symbol.
///
/// Dates are non-decreasing. Duplicate dates are allowed and kept in the
/// order the feed delivered them. There are no mutable accessors: once
/// built, a series is only ever lent out by shared reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: Symbol,
    points: Vec<PricePoint>,
}

impl Series {
    /// Build a series, stably sorting by date if needed.
    ///
    /// An empty point list is `NoData`: an empty series is never a valid
    /// artifact. Every close must be finite.
    pub fn new(symbol: Symbol, mut points: Vec<PricePoint>) -> Result<Self, QuoteError> {
        if points.is_empty() {
            return Err(QuoteError::NoData {
                symbol: symbol.to_string(),
            });
        }
        if let Some(bad) = points.iter().find(|p| !p.close.is_finite()) {
            return Err(QuoteError::NonFiniteClose {
                date: bad.date,
                close: bad.close,
            });
        }
        if !is_chronological(&points) {
            points.sort_by_key(|p| p.date);
        }
        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }

    /// (min, max) close across the series.
    pub fn close_range(&self) -> (f64, f64) {
        self.points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.close), hi.max(p.close))
            })
    }
}

/// True when dates never go backwards.
pub fn is_chronological(points: &[PricePoint]) -> bool {
    points.windows(2).all(|w| w[0].date <= w[1].date)
}
