//! Serializable pipeline configuration.
//!
//! Every field has a default, so an empty TOML file (or none at all) gives
//! the stock setup: Yahoo Finance, lenient conversion, an 8 x 4 inch chart
//! at 100 DPI, CSV output in the working directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::ConversionPolicy;
use crate::domain::Universe;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration for one pipeline host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory the CSV table is written to.
    pub output_dir: PathBuf,
    pub conversion: ConversionPolicy,
    pub chart: ChartConfig,
    pub source: SourceConfig,
    pub universe: Universe,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            conversion: ConversionPolicy::default(),
            chart: ChartConfig::default(),
            source: SourceConfig::default(),
            universe: Universe::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chart.validate()?;
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid("source.timeout_secs must be > 0".into()));
        }
        if self.source.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("source.base_url is empty".into()));
        }
        Ok(())
    }
}

/// Chart canvas size in inch-equivalents at a fixed resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width_in: 8.0,
            height_in: 4.0,
            dpi: 100,
        }
    }
}

impl ChartConfig {
    /// Canvas size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |inches: f64| (inches * f64::from(self.dpi)).round() as u32;
        (px(self.width_in), px(self.height_in))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = self.pixel_size();
        if !(self.width_in.is_finite() && self.height_in.is_finite()) || w < 64 || h < 64 {
            return Err(ConfigError::Invalid(format!(
                "chart canvas {w}x{h} px is too small (minimum 64x64)"
            )));
        }
        if w > 8192 || h > 8192 {
            return Err(ConfigError::Invalid(format!(
                "chart canvas {w}x{h} px is too large (maximum 8192x8192)"
            )));
        }
        Ok(())
    }
}

/// Remote chart API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".into(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
        }
    }
}
