//! Universe: the ticker list offered to the user, plus the default pick.
//!
//! Stored in the `[universe]` table of the pipeline config. The list is a
//! convenience for hosts (a dropdown, `quotegraph tickers`); any other
//! symbol can still be downloaded.

use serde::{Deserialize, Serialize};

use super::Symbol;
use crate::error::QuoteError;

/// Major technology-sector tickers.
pub const TECH_TICKERS: [&str; 15] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META", "ORCL", "IBM", "ADBE", "INTC",
    "CSCO", "AMD", "PYPL", "CRM",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Universe {
    pub tickers: Vec<String>,
    pub default_symbol: String,
}

impl Default for Universe {
    fn default() -> Self {
        Self::technology()
    }
}

impl Universe {
    pub fn technology() -> Self {
        Self {
            tickers: TECH_TICKERS.iter().map(|t| t.to_string()).collect(),
            default_symbol: "AAPL".into(),
        }
    }

    /// Case-insensitive membership check.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.tickers
            .iter()
            .any(|t| t.eq_ignore_ascii_case(symbol.as_str()))
    }

    pub fn default_symbol(&self) -> Result<Symbol, QuoteError> {
        Symbol::parse(&self.default_symbol)
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}
