//! Data acquisition: raw bar sources and series normalization

pub mod memory;
pub mod normalize;
pub mod provider;
pub mod yahoo;

pub use memory::{daily_bars, MemorySource};
pub use normalize::{convert_bar, ConversionPolicy, SeriesNormalizer};
pub use provider::{Interval, RawBar, RawBarSource, RawBarStream, SourceError};
pub use yahoo::YahooSource;
