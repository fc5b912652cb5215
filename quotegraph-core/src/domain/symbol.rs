//! Ticker symbol.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// Upper-cased, trimmed ticker symbol.
///
/// Matching against the feed is case-insensitive, so the canonical form is
/// upper case. Yahoo-style punctuation (`BRK-B`, `^GSPC`, `EURUSD=X`) is
/// kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, QuoteError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(QuoteError::InvalidSymbol(input.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name the CSV table is saved under.
    pub fn csv_file_name(&self) -> String {
        format!("{}_stock_data.csv", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = QuoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}
