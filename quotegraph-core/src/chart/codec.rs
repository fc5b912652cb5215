//! PNG codec for rendered charts, plus the blank placeholder image.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use crate::error::QuoteError;

/// Side length of the placeholder shown before any fetch.
pub const PLACEHOLDER_SIZE: u32 = 100;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Encode an RGB raster as PNG.
pub fn encode(image: &RgbImage) -> Result<Vec<u8>, QuoteError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Decode PNG bytes into an RGB raster. Alpha, if present, is dropped.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, QuoteError> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.into_rgb8())
}

/// All-white raster of the given size.
///
/// Zero-sized images are allowed here but cannot be encoded.
pub fn blank(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

/// PNG bytes of the blank placeholder.
pub fn placeholder_png() -> Result<Vec<u8>, QuoteError> {
    encode(&blank(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE))
}
