//! Yahoo Finance bar source.
//!
//! Fetches the full daily history from Yahoo's v8 chart API in a single
//! request and replays it as a raw bar stream. Close prices are kept as the
//! decimal text from the JSON payload (serde_json's `arbitrary_precision`
//! keeps number literals unrounded); conversion happens in the normalizer.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. There is deliberately no retry: a failed request surfaces as a
//! `SourceError` and the caller decides what to do.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::provider::{Interval, RawBar, RawBarSource, RawBarStream, SourceError};
use crate::config::SourceConfig;
use crate::domain::Symbol;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Value>,
}

/// Yahoo Finance bar source.
pub struct YahooSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooSource {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SourceError::NetworkUnreachable(format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Build the chart API URL for the full history of a symbol.
    fn chart_url(&self, symbol: &Symbol, interval: Interval) -> Result<Url, SourceError> {
        let invalid =
            |reason: String| SourceError::NetworkUnreachable(format!("invalid base URL: {reason}"));

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol.as_str()]);
        url.query_pairs_mut()
            .append_pair("range", "max")
            .append_pair("interval", interval.as_query());
        Ok(url)
    }
}

/// Parse the chart API response into raw bars.
///
/// A `Not Found` error or a result without timestamps means the symbol has
/// no history; that is an empty list, not an error.
fn parse_response(symbol: &Symbol, resp: ChartResponse) -> Result<Vec<RawBar>, SourceError> {
    let Some(result) = resp.chart.result else {
        return match resp.chart.error {
            Some(err) if err.code == "Not Found" => {
                debug!(%symbol, "chart API reports symbol not found");
                Ok(Vec::new())
            }
            Some(err) => Err(SourceError::ResponseFormatChanged(format!(
                "{}: {}",
                err.code, err.description
            ))),
            None => Err(SourceError::ResponseFormatChanged(
                "empty result with no error".into(),
            )),
        };
    };

    let Some(data) = result.into_iter().next() else {
        return Ok(Vec::new());
    };
    let Some(timestamps) = data.timestamp else {
        return Ok(Vec::new());
    };

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::ResponseFormatChanged("no quote data".into()))?;

    if quote.close.len() != timestamps.len() {
        return Err(SourceError::ResponseFormatChanged(format!(
            "{} timestamps but {} closes",
            timestamps.len(),
            quote.close.len()
        )));
    }

    let bars = timestamps
        .into_iter()
        .zip(quote.close)
        .filter_map(|(ts, close)| match close {
            // Null close: non-trading day
            Value::Null => None,
            Value::Number(n) => Some(RawBar::new(ts, n.to_string())),
            Value::String(s) => Some(RawBar::new(ts, s)),
            other => Some(RawBar::new(ts, other.to_string())),
        })
        .collect();

    Ok(bars)
}

impl RawBarSource for YahooSource {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn open(&self, symbol: &Symbol, interval: Interval) -> Result<RawBarStream, SourceError> {
        let url = self.chart_url(symbol, interval)?;
        debug!(%url, "requesting chart history");

        let resp = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                SourceError::NetworkUnreachable(format!("timed out: {e}"))
            } else {
                SourceError::NetworkUnreachable(e.to_string())
            }
        })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%symbol, "chart API returned 404");
            return Ok(Box::new(std::iter::empty()));
        }
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            SourceError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let bars = parse_response(symbol, chart)?;
        debug!(%symbol, bars = bars.len(), "chart history received");
        Ok(Box::new(bars.into_iter().map(Ok)))
    }
}
