//! Domain types for quotegraph

pub mod series;
pub mod symbol;
pub mod universe;

pub use series::{is_chronological, PricePoint, Series};
pub use symbol::Symbol;
pub use universe::{Universe, TECH_TICKERS};
