//! quotegraph core: daily price history pipeline.
//!
//! This crate contains:
//! - Domain types (symbol, price point, series, ticker universe)
//! - Raw bar sources (Yahoo Finance chart API, in-memory fixtures)
//! - Series normalization with a configurable conversion policy
//! - CSV table export and re-import
//! - Line chart rendering and PNG encoding
//! - The fetch → normalize → {table, chart} pipeline

pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod export;
pub mod pipeline;

pub use config::{ChartConfig, ConfigError, PipelineConfig, SourceConfig};
pub use data::{ConversionPolicy, RawBar, RawBarSource, SeriesNormalizer, SourceError};
pub use domain::{PricePoint, Series, Symbol, Universe};
pub use error::QuoteError;
pub use pipeline::{DownloadSummary, Pipeline, RenderedArtifacts};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a host might move to a worker thread
    /// is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Series>();
        require_sync::<Series>();
        require_send::<RenderedArtifacts>();
        require_sync::<RenderedArtifacts>();
        require_send::<DownloadSummary>();
        require_sync::<DownloadSummary>();
        require_send::<QuoteError>();
        require_sync::<QuoteError>();
        require_send::<PipelineConfig>();
        require_sync::<PipelineConfig>();
        require_send::<chart::ChartRenderer>();
        require_sync::<chart::ChartRenderer>();
        require_send::<data::YahooSource>();
        require_sync::<data::YahooSource>();
        require_send::<data::MemorySource>();
        require_sync::<data::MemorySource>();
        require_send::<data::RawBarStream>();
    }

    /// Pipelines share nothing: two symbols run back to back on the same
    /// source give independent results.
    #[test]
    fn pipeline_keeps_no_state_between_runs() {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let a = Symbol::parse("AAA").unwrap();
        let b = Symbol::parse("BBB").unwrap();
        let source = data::MemorySource::new()
            .with_bars(&a, data::daily_bars(start, &["1", "2", "3"]))
            .with_bars(&b, data::daily_bars(start, &["10", "20"]));
        let pipeline = Pipeline::new(&source, &PipelineConfig::default());

        let (sa, _) = pipeline.run(&a).unwrap();
        let (sb, _) = pipeline.run(&b).unwrap();

        assert_eq!(sa.len(), 3);
        assert_eq!(sb.len(), 2);
        assert_eq!(sb.symbol(), &b);
    }
}
