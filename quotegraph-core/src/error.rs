//! Pipeline error taxonomy.
//!
//! Every stage returns either its value or exactly one `QuoteError`. The
//! variants are split so hosts can message users differently: an unknown or
//! delisted symbol (`NoData`) is not a network problem (`Transport`).

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::ConfigError;
use crate::data::provider::SourceError;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("invalid ticker symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("transport error: {0}")]
    Transport(#[from] SourceError),

    #[error("no data found for {symbol}")]
    NoData { symbol: String },

    #[error("cannot convert bar at t={timestamp} (close {payload:?}): {reason}")]
    Conversion {
        timestamp: i64,
        payload: String,
        reason: String,
    },

    #[error("close on {date} is not a finite number: {close}")]
    NonFiniteClose { date: NaiveDate, close: f64 },

    #[error("insufficient data: need at least {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("render error: {0}")]
    Render(String),

    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed table at line {line}: {reason}")]
    MalformedTable { line: u64, reason: String },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl QuoteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures a user can fix by choosing another symbol.
    pub fn is_symbol_problem(&self) -> bool {
        matches!(self, Self::InvalidSymbol(_) | Self::NoData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_message_names_symbol() {
        let err = QuoteError::NoData {
            symbol: "ZZZZ".into(),
        };
        assert_eq!(err.to_string(), "no data found for ZZZZ");
        assert!(err.is_symbol_problem());
    }

    #[test]
    fn transport_wraps_source_error() {
        let err: QuoteError = SourceError::Interrupted("socket closed".into()).into();
        assert!(matches!(err, QuoteError::Transport(_)));
        assert!(!err.is_symbol_problem());
        assert!(err.to_string().contains("socket closed"));
    }
}
