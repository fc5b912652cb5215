//! Raw bar source trait and transport error types.
//!
//! The RawBarSource trait abstracts over the remote feed (Yahoo Finance, an
//! in-memory fixture) so the normalizer never knows where bars came from.
//! A source hands out a pull-based stream; an `Err` item is the feed's
//! terminal error signal and may arrive after any number of good bars.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Symbol;

/// Raw daily bar as delivered by a feed (before conversion).
///
/// `close` is the decimal text exactly as the feed encoded it; turning it
/// into a float is the normalizer's job and may fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBar {
    /// Epoch seconds.
    pub timestamp: i64,
    pub close: String,
}

impl RawBar {
    pub fn new(timestamp: i64, close: impl Into<String>) -> Self {
        Self {
            timestamp,
            close: close.into(),
        }
    }
}

/// Bar interval. Only daily bars are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interval {
    #[default]
    Daily,
}

impl Interval {
    /// Query-string form understood by chart APIs.
    pub fn as_query(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
        }
    }
}

/// Transport-level failures from a bar source.
///
/// Designed to be displayable in both CLI and GUI contexts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {symbol}")]
    HttpStatus { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("stream interrupted: {0}")]
    Interrupted(String),
}

/// Pull-based stream of raw bars. Ends at `None`; an `Err` item aborts.
pub type RawBarStream = Box<dyn Iterator<Item = Result<RawBar, SourceError>> + Send>;

/// Trait for raw bar feeds (Yahoo Finance, in-memory fixtures).
pub trait RawBarSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Open a stream of bars for `symbol`, oldest first.
    ///
    /// An unknown symbol is an empty stream, not an error.
    fn open(&self, symbol: &Symbol, interval: Interval) -> Result<RawBarStream, SourceError>;
}
