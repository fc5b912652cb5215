//! Line chart rendering into an in-memory RGB raster.
//!
//! The X axis runs over point indices (so weekends and holidays leave no
//! gaps) and tick labels show the date of the nearest point. Drawing goes
//! straight into a pixel buffer; nothing touches the filesystem, so any
//! number of renders can run side by side.

use std::error::Error;
use std::ops::Range;

use image::RgbImage;
use plotters::prelude::*;

use super::font::{self, FONT_FAMILY};
use crate::config::ChartConfig;
use crate::domain::{Series, Symbol};
use crate::error::QuoteError;

/// A line needs two points.
pub const MIN_POINTS: usize = 2;

const X_TICKS: usize = 6;
const Y_TICKS: usize = 8;
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Canvas size in pixels; identical for every render.
    pub fn dimensions(&self) -> (u32, u32) {
        self.config.pixel_size()
    }

    /// Render `series` as a closing-price line chart titled for `symbol`.
    pub fn render(&self, symbol: &Symbol, series: &Series) -> Result<RgbImage, QuoteError> {
        if series.len() < MIN_POINTS {
            return Err(QuoteError::InsufficientData {
                needed: MIN_POINTS,
                got: series.len(),
            });
        }
        font::ensure_registered()?;

        let (width, height) = self.dimensions();
        let mut buf = vec![0u8; width as usize * height as usize * 3];
        draw(&mut buf, (width, height), symbol, series)
            .map_err(|e| QuoteError::Render(e.to_string()))?;

        RgbImage::from_raw(width, height, buf)
            .ok_or_else(|| QuoteError::Render("pixel buffer does not match canvas size".into()))
    }
}

fn draw(
    buf: &mut [u8],
    size: (u32, u32),
    symbol: &Symbol,
    series: &Series,
) -> Result<(), Box<dyn Error>> {
    let points = series.points();
    let last_index = (points.len() - 1) as f64;

    let root = BitMapBackend::with_buffer(buf, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{symbol} Stock Price"),
            (FONT_FAMILY, 22).into_font(),
        )
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(72)
        .build_cartesian_2d(0f64..last_index, price_axis(series))?;

    let date_label = |x: &f64| {
        let i = x.round();
        if i < 0.0 || i > last_index || (x - i).abs() > 1e-6 {
            return String::new();
        }
        points[i as usize].date.format("%Y-%m-%d").to_string()
    };
    let price_label = |y: &f64| format!("{y:.2}");

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Price (USD)")
        .x_labels(X_TICKS)
        .y_labels(Y_TICKS)
        .x_label_formatter(&date_label)
        .y_label_formatter(&price_label)
        .label_style((FONT_FAMILY, 12).into_font())
        .axis_desc_style((FONT_FAMILY, 14).into_font())
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            points
                .iter()
                .enumerate()
                .map(|(i, p)| (i as f64, p.close)),
            LINE_COLOR.stroke_width(2),
        ))?
        .label(format!("{symbol} Closing Price"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LINE_COLOR.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT_FAMILY, 13).into_font())
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Y range with 5% headroom; a flat series gets a fixed band around it.
fn price_axis(series: &Series) -> Range<f64> {
    let (lo, hi) = series.close_range();
    let span = hi - lo;
    let pad = if span > hi.abs().max(1.0) * 1e-9 {
        span * 0.05
    } else {
        (hi.abs() * 0.01).max(1.0)
    };
    (lo - pad)..(hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + chrono::Days::new(i as u64), c))
            .collect();
        Series::new(Symbol::parse("TEST").unwrap(), points).unwrap()
    }

    #[test]
    fn single_point_is_insufficient() {
        let s = series(&[100.0]);
        let err = ChartRenderer::default()
            .render(s.symbol(), &s)
            .unwrap_err();
        assert!(matches!(
            err,
            QuoteError::InsufficientData { needed: 2, got: 1 }
        ));
    }

    #[test]
    fn renders_default_canvas() {
        let s = series(&[100.0, 101.5, 99.25, 102.0]);
        let img = ChartRenderer::default().render(s.symbol(), &s).unwrap();
        assert_eq!(img.dimensions(), (800, 400));
    }

    #[test]
    fn chart_is_not_blank() {
        let s = series(&[100.0, 110.0, 105.0]);
        let img = ChartRenderer::default().render(s.symbol(), &s).unwrap();
        let non_white = img.pixels().filter(|p| p.0 != [255, 255, 255]).count();
        assert!(non_white > 1000, "only {non_white} drawn pixels");
    }

    #[test]
    fn flat_series_renders() {
        let s = series(&[50.0, 50.0, 50.0]);
        assert!(ChartRenderer::default().render(s.symbol(), &s).is_ok());
    }

    #[test]
    fn custom_canvas_size_is_honored() {
        let renderer = ChartRenderer::new(ChartConfig {
            width_in: 6.0,
            height_in: 3.0,
            dpi: 80,
        });
        let s = series(&[1.0, 2.0]);
        let img = renderer.render(s.symbol(), &s).unwrap();
        assert_eq!(img.dimensions(), (480, 240));
        assert_eq!(renderer.dimensions(), (480, 240));
    }

    #[test]
    fn price_axis_pads_flat_series() {
        let s = series(&[50.0, 50.0]);
        let r = price_axis(&s);
        assert!(r.start < 50.0 && r.end > 50.0);
    }

    #[test]
    fn price_axis_adds_headroom() {
        let s = series(&[100.0, 200.0]);
        assert_eq!(price_axis(&s), 95.0..205.0);
    }
}
