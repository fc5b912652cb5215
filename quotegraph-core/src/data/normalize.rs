//! Series normalization: raw bar stream to a validated, ordered Series.
//!
//! Each raw bar is converted independently: epoch seconds become a UTC
//! calendar date and the decimal close text becomes an `f64` by way of
//! `rust_decimal`. Losing the least-significant digits in that last step is
//! expected and not an error. A bar whose payload is not a number at all is
//! handled by the configured [`ConversionPolicy`].
//!
//! Transport errors are never softened: an `Err` item anywhere in the
//! stream aborts normalization and the points gathered so far are dropped.

use std::str::FromStr;

use chrono::DateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::provider::{RawBar, SourceError};
use crate::domain::{is_chronological, PricePoint, Series, Symbol};
use crate::error::QuoteError;

/// What to do with a bar whose close or timestamp cannot be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionPolicy {
    /// Skip the bar and keep going. If nothing survives, the result is
    /// `NoData`.
    #[default]
    Lenient,
    /// Abort the whole fetch with `QuoteError::Conversion`.
    Strict,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesNormalizer {
    policy: ConversionPolicy,
}

impl SeriesNormalizer {
    pub fn new(policy: ConversionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ConversionPolicy {
        self.policy
    }

    /// Drain `stream` into a Series for `symbol`.
    pub fn normalize<I>(&self, symbol: &Symbol, stream: I) -> Result<Series, QuoteError>
    where
        I: IntoIterator<Item = Result<RawBar, SourceError>>,
    {
        let mut points = Vec::new();
        let mut skipped = 0usize;

        for item in stream {
            let bar = item?;
            match convert_bar(&bar) {
                Ok(point) => points.push(point),
                Err(err) if self.policy == ConversionPolicy::Lenient => {
                    skipped += 1;
                    warn!(%symbol, timestamp = bar.timestamp, error = %err, "skipping unconvertible bar");
                }
                Err(err) => return Err(err),
            }
        }

        if !is_chronological(&points) {
            warn!(%symbol, "feed delivered bars out of date order; sorting");
        }

        let series = Series::new(symbol.clone(), points)?;
        info!(
            %symbol,
            points = series.len(),
            skipped,
            first = %series.first_date(),
            last = %series.last_date(),
            "normalized daily series"
        );
        Ok(series)
    }
}

/// Convert one raw bar into a PricePoint.
pub fn convert_bar(bar: &RawBar) -> Result<PricePoint, QuoteError> {
    let fail = |reason: String| QuoteError::Conversion {
        timestamp: bar.timestamp,
        payload: bar.close.clone(),
        reason,
    };

    let date = DateTime::from_timestamp(bar.timestamp, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| fail("timestamp out of range".into()))?;
    let close = decimal_to_f64(&bar.close).map_err(fail)?;

    Ok(PricePoint::new(date, close))
}

/// Parse decimal text (plain or scientific notation) into a finite `f64`.
fn decimal_to_f64(text: &str) -> Result<f64, String> {
    let text = text.trim();
    let decimal = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| format!("not a decimal number: {e}"))?;
    decimal
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{decimal} has no finite f64 representation"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::daily_bars;
    use chrono::NaiveDate;

    fn sym() -> Symbol {
        Symbol::parse("TEST").unwrap()
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn ok_stream(bars: Vec<RawBar>) -> Vec<Result<RawBar, SourceError>> {
        bars.into_iter().map(Ok).collect()
    }

    #[test]
    fn converts_timestamp_to_utc_date() {
        // 2024-01-02 23:59:59 UTC
        let point = convert_bar(&RawBar::new(1_704_239_999, "1.5")).unwrap();
        assert_eq!(point.date, start());
        assert_eq!(point.close, 1.5);
    }

    #[test]
    fn accepts_scientific_notation() {
        assert_eq!(decimal_to_f64("1.5e2").unwrap(), 150.0);
        assert_eq!(decimal_to_f64(" 42 ").unwrap(), 42.0);
    }

    #[test]
    fn long_decimals_lose_precision_quietly() {
        let v = decimal_to_f64("185.640007019042968750000001").unwrap();
        assert!((v - 185.64000701904297).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_numeric_payload() {
        for bad in ["", "n/a", "NaN", "12.3.4"] {
            let err = convert_bar(&RawBar::new(0, bad)).unwrap_err();
            assert!(matches!(err, QuoteError::Conversion { .. }), "{bad:?}: {err}");
        }
    }

    #[test]
    fn rejects_out_of_range_timestamp() {
        let err = convert_bar(&RawBar::new(i64::MAX, "1.0")).unwrap_err();
        assert!(matches!(err, QuoteError::Conversion { reason, .. } if reason.contains("timestamp")));
    }

    #[test]
    fn lenient_policy_skips_bad_bars() {
        let bars = daily_bars(start(), &["100.5", "oops", "101.25"]);
        let series = SeriesNormalizer::new(ConversionPolicy::Lenient)
            .normalize(&sym(), ok_stream(bars))
            .unwrap();
        let closes: Vec<f64> = series.points().iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![100.5, 101.25]);
    }

    #[test]
    fn lenient_policy_with_nothing_left_is_no_data() {
        let bars = daily_bars(start(), &["x", "y"]);
        let err = SeriesNormalizer::default()
            .normalize(&sym(), ok_stream(bars))
            .unwrap_err();
        assert!(matches!(err, QuoteError::NoData { .. }));
    }

    #[test]
    fn strict_policy_aborts_on_bad_bar() {
        let bars = daily_bars(start(), &["100.5", "oops", "101.25"]);
        let err = SeriesNormalizer::new(ConversionPolicy::Strict)
            .normalize(&sym(), ok_stream(bars))
            .unwrap_err();
        match err {
            QuoteError::Conversion { payload, .. } => assert_eq!(payload, "oops"),
            other => panic!("expected Conversion, got {other:?}"),
        }
    }

    #[test]
    fn empty_stream_is_no_data() {
        let err = SeriesNormalizer::default()
            .normalize(&sym(), Vec::new())
            .unwrap_err();
        assert!(matches!(err, QuoteError::NoData { symbol } if symbol == "TEST"));
    }

    #[test]
    fn mid_stream_error_discards_partial_series() {
        let mut stream = ok_stream(daily_bars(start(), &["1", "2", "3"]));
        stream.push(Err(SourceError::Interrupted("connection reset".into())));
        stream.extend(ok_stream(daily_bars(start(), &["4"])));

        let err = SeriesNormalizer::default()
            .normalize(&sym(), stream)
            .unwrap_err();
        assert!(matches!(err, QuoteError::Transport(SourceError::Interrupted(_))));
    }

    #[test]
    fn out_of_order_feed_is_sorted() {
        let mut bars = daily_bars(start(), &["1", "2", "3"]);
        bars.swap(0, 2);
        let series = SeriesNormalizer::default()
            .normalize(&sym(), ok_stream(bars))
            .unwrap();
        assert!(is_chronological(series.points()));
        assert_eq!(series.points()[0].close, 1.0);
    }

    #[test]
    fn policy_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: ConversionPolicy,
        }
        let w: Wrapper = toml::from_str("policy = \"strict\"").unwrap();
        assert_eq!(w.policy, ConversionPolicy::Strict);
    }
}
