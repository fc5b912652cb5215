//! Pipeline: fetch → normalize → {CSV table, chart image}.
//!
//! One invocation handles one symbol and keeps no state afterwards. The
//! series is built once and lent to both sinks; both artifacts are produced
//! in memory before anything is written, so a failure in either sink leaves
//! the output directory untouched.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use image::RgbImage;
use tracing::info;

use crate::chart::{self, ChartRenderer};
use crate::config::PipelineConfig;
use crate::data::{Interval, RawBarSource, SeriesNormalizer};
use crate::domain::{Series, Symbol};
use crate::error::QuoteError;
use crate::export;

/// The two artifacts derived from one series.
#[derive(Debug, Clone)]
pub struct RenderedArtifacts {
    /// CSV table bytes.
    pub table_bytes: Vec<u8>,
    pub image: RgbImage,
    /// PNG encoding of `image`.
    pub image_bytes: Vec<u8>,
}

/// What a completed download produced.
#[derive(Debug, Clone)]
pub struct DownloadSummary {
    pub symbol: Symbol,
    pub points: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub csv_path: PathBuf,
    pub artifacts: RenderedArtifacts,
}

pub struct Pipeline<'a> {
    source: &'a dyn RawBarSource,
    normalizer: SeriesNormalizer,
    renderer: ChartRenderer,
}

impl<'a> Pipeline<'a> {
    pub fn new(source: &'a dyn RawBarSource, config: &PipelineConfig) -> Self {
        Self {
            source,
            normalizer: SeriesNormalizer::new(config.conversion),
            renderer: ChartRenderer::new(config.chart),
        }
    }

    pub fn renderer(&self) -> &ChartRenderer {
        &self.renderer
    }

    /// Pull the daily history for `symbol` and normalize it.
    pub fn fetch(&self, symbol: &Symbol) -> Result<Series, QuoteError> {
        info!(%symbol, source = self.source.name(), "fetching daily history");
        let stream = self.source.open(symbol, Interval::Daily)?;
        self.normalizer.normalize(symbol, stream)
    }

    /// Produce both artifacts from one series.
    pub fn render(&self, series: &Series) -> Result<RenderedArtifacts, QuoteError> {
        let table_bytes = export::serialize(series)?;
        let image = self.renderer.render(series.symbol(), series)?;
        let image_bytes = chart::encode(&image)?;
        Ok(RenderedArtifacts {
            table_bytes,
            image,
            image_bytes,
        })
    }

    /// Fetch and render without touching the filesystem.
    pub fn run(&self, symbol: &Symbol) -> Result<(Series, RenderedArtifacts), QuoteError> {
        let series = self.fetch(symbol)?;
        let artifacts = self.render(&series)?;
        Ok((series, artifacts))
    }

    /// Full download: fetch, render, then save `<SYMBOL>_stock_data.csv`
    /// into `output_dir`.
    pub fn download(&self, symbol: &Symbol, output_dir: &Path) -> Result<DownloadSummary, QuoteError> {
        let (series, artifacts) = self.run(symbol)?;

        let csv_path = output_dir.join(symbol.csv_file_name());
        export::write_file(&csv_path, &artifacts.table_bytes)?;
        info!(%symbol, path = %csv_path.display(), "saved table");

        Ok(DownloadSummary {
            symbol: symbol.clone(),
            points: series.len(),
            first_date: series.first_date(),
            last_date: series.last_date(),
            csv_path,
            artifacts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{daily_bars, MemorySource, SourceError};

    fn sym(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn download_writes_csv_named_after_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySource::new()
            .with_bars(&sym("TEST"), daily_bars(start(), &["100.123456", "101.654321"]));
        let pipeline = Pipeline::new(&source, &PipelineConfig::default());

        let summary = pipeline.download(&sym("test"), dir.path()).unwrap();

        assert_eq!(summary.points, 2);
        assert_eq!(summary.csv_path, dir.path().join("TEST_stock_data.csv"));
        let written = std::fs::read(&summary.csv_path).unwrap();
        assert_eq!(written, summary.artifacts.table_bytes);
        assert_eq!(summary.artifacts.image.dimensions(), (800, 400));
    }

    #[test]
    fn render_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySource::new().with_bars(&sym("ONE"), daily_bars(start(), &["5.0"]));
        let pipeline = Pipeline::new(&source, &PipelineConfig::default());

        let err = pipeline.download(&sym("ONE"), dir.path()).unwrap_err();

        assert!(matches!(err, QuoteError::InsufficientData { got: 1, .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn open_error_is_transport() {
        let source = MemorySource::new()
            .with_open_error(&sym("X"), SourceError::NetworkUnreachable("offline".into()));
        let pipeline = Pipeline::new(&source, &PipelineConfig::default());
        assert!(matches!(
            pipeline.fetch(&sym("X")),
            Err(QuoteError::Transport(_))
        ));
    }

    #[test]
    fn unknown_symbol_is_no_data() {
        let source = MemorySource::new();
        let pipeline = Pipeline::new(&source, &PipelineConfig::default());
        let err = pipeline.run(&sym("ZZZZ")).unwrap_err();
        assert!(err.is_symbol_problem());
    }
}
