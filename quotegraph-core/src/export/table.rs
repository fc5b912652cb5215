//! CSV table export: `Date,Close`, one record per point.
//!
//! Closes are written with six fractional digits, so reading a table back
//! recovers each close to within 5e-7. Output is deterministic: the same
//! series always serializes to the same bytes.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{PricePoint, Series};
use crate::error::QuoteError;

pub const HEADER: [&str; 2] = ["Date", "Close"];
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Serialize a series to CSV bytes.
pub fn serialize(series: &Series) -> Result<Vec<u8>, QuoteError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(HEADER)?;
    for point in series.points() {
        wtr.write_record([
            point.date.format(DATE_FORMAT).to_string(),
            format!("{:.6}", point.close),
        ])?;
    }
    wtr.into_inner()
        .map_err(|e| QuoteError::Csv(e.into_error().into()))
}

/// Parse CSV bytes produced by [`serialize`] back into points.
pub fn parse(bytes: &[u8]) -> Result<Vec<PricePoint>, QuoteError> {
    let mut rdr = csv::Reader::from_reader(bytes);

    let headers = rdr.headers()?;
    if headers.iter().ne(HEADER) {
        return Err(QuoteError::MalformedTable {
            line: 1,
            reason: format!("expected header {}, got {:?}", HEADER.join(","), headers),
        });
    }

    let mut points = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let malformed = |reason: String| QuoteError::MalformedTable { line, reason };

        if record.len() != HEADER.len() {
            return Err(malformed(format!("expected 2 fields, got {}", record.len())));
        }
        let date = NaiveDate::parse_from_str(&record[0], DATE_FORMAT)
            .map_err(|e| malformed(format!("bad date {:?}: {e}", &record[0])))?;
        let close: f64 = record[1]
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| malformed(format!("bad close {:?}", &record[1])))?;
        points.push(PricePoint::new(date, close));
    }
    Ok(points)
}

/// Write `bytes` to `path` atomically.
///
/// The data goes to a uniquely named temp file next to `path` and is renamed
/// into place only after a successful write, so a failure never leaves a
/// truncated table behind.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), QuoteError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".quotegraph-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| QuoteError::io(dir, e))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| QuoteError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| QuoteError::io(path, e.error))?;
    Ok(())
}
