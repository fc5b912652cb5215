//! quotegraph CLI: download, plot, and placeholder commands.
//!
//! Commands:
//! - `download`: fetch a ticker's full daily history, save it as CSV, render the chart
//! - `plot`: re-render a chart from a previously saved CSV table
//! - `tickers`: list the configured ticker universe
//! - `blank`: write the blank placeholder PNG

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use quotegraph_core::chart::{self, ChartRenderer, PLACEHOLDER_SIZE};
use quotegraph_core::data::YahooSource;
use quotegraph_core::{export, ConversionPolicy, Pipeline, PipelineConfig, Series, Symbol};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "quotegraph",
    about = "quotegraph: daily stock price downloader and chart renderer"
)]
struct Cli {
    /// Path to a TOML config file. Defaults apply to anything not set.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a ticker's daily history, save CSV, and render the chart.
    Download {
        /// Ticker symbol (case-insensitive). Defaults to the universe default.
        symbol: Option<String>,

        /// Directory for `<SYMBOL>_stock_data.csv`. Overrides the config.
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Also write the rendered chart as PNG to this path.
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Abort on the first bar whose price cannot be converted.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Render a chart from a saved CSV table.
    Plot {
        /// CSV file with a `Date,Close` header.
        #[arg(long)]
        csv: PathBuf,

        /// Symbol for the chart title.
        #[arg(long)]
        symbol: String,

        /// Output PNG path.
        #[arg(long)]
        out: PathBuf,
    },
    /// List the configured ticker universe.
    Tickers,
    /// Write a blank white placeholder PNG.
    Blank {
        /// Output PNG path.
        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value_t = PLACEHOLDER_SIZE)]
        width: u32,

        #[arg(long, default_value_t = PLACEHOLDER_SIZE)]
        height: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quotegraph_core=info,quotegraph=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Download {
            symbol,
            out_dir,
            chart,
            strict,
        } => run_download(config, symbol, out_dir, chart, strict),
        Commands::Plot { csv, symbol, out } => run_plot(&config, &csv, &symbol, &out),
        Commands::Tickers => run_tickers(&config),
        Commands::Blank { out, width, height } => run_blank(&out, width, height),
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn run_download(
    mut config: PipelineConfig,
    symbol: Option<String>,
    out_dir: Option<PathBuf>,
    chart_path: Option<PathBuf>,
    strict: bool,
) -> Result<()> {
    let symbol = match symbol {
        Some(s) => Symbol::parse(&s)?,
        None => config.universe.default_symbol()?,
    };
    if strict {
        config.conversion = ConversionPolicy::Strict;
    }
    let out_dir = out_dir.unwrap_or_else(|| config.output_dir.clone());
    if !config.universe.contains(&symbol) {
        debug!(%symbol, "symbol is outside the configured universe");
    }

    let source = YahooSource::new(&config.source).context("failed to set up data source")?;
    let pipeline = Pipeline::new(&source, &config);

    let summary = pipeline
        .download(&symbol, &out_dir)
        .with_context(|| format!("failed to fetch data for {symbol}"))?;

    if let Some(path) = chart_path {
        std::fs::write(&path, &summary.artifacts.image_bytes)
            .with_context(|| format!("failed to write chart {}", path.display()))?;
        println!("Chart saved as {}", path.display());
    }

    println!(
        "Data saved as {} ({} days, {} to {})",
        summary.csv_path.display(),
        summary.points,
        summary.first_date,
        summary.last_date
    );
    Ok(())
}

fn run_plot(config: &PipelineConfig, csv: &Path, symbol: &str, out: &Path) -> Result<()> {
    let symbol = Symbol::parse(symbol)?;
    let bytes =
        std::fs::read(csv).with_context(|| format!("failed to read {}", csv.display()))?;
    let points = export::parse(&bytes)
        .with_context(|| format!("failed to parse {}", csv.display()))?;
    let series = Series::new(symbol.clone(), points)?;

    let image = ChartRenderer::new(config.chart).render(&symbol, &series)?;
    let png = chart::encode(&image)?;
    std::fs::write(out, png).with_context(|| format!("failed to write {}", out.display()))?;

    println!("Chart saved as {}", out.display());
    Ok(())
}

fn run_tickers(config: &PipelineConfig) -> Result<()> {
    for ticker in &config.universe.tickers {
        if ticker.eq_ignore_ascii_case(&config.universe.default_symbol) {
            println!("{ticker} (default)");
        } else {
            println!("{ticker}");
        }
    }
    Ok(())
}

fn run_blank(out: &Path, width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("placeholder size must be non-zero, got {width}x{height}");
    }
    let png = chart::encode(&chart::blank(width, height))?;
    std::fs::write(out, png).with_context(|| format!("failed to write {}", out.display()))?;
    println!("Placeholder saved as {}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn download_symbol_is_optional() {
        let cli = Cli::try_parse_from(["quotegraph", "download"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Download { symbol: None, strict: false, .. }
        ));
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["quotegraph", "tickers", "--config", "qg.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("qg.toml")));
    }

    #[test]
    fn blank_writes_placeholder_png() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("placeholder.png");
        run_blank(&out, 10, 20).unwrap();
        let img = chart::decode(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(img.dimensions(), (10, 20));
    }

    #[test]
    fn blank_rejects_zero_size() {
        assert!(run_blank(Path::new("unused.png"), 0, 5).is_err());
    }
}
