//! Embedded chart font.
//!
//! Charts must render on headless machines with no system fonts, so the
//! sans-serif family is backed by a font compiled into the binary and
//! registered with plotters once per process.

use std::sync::OnceLock;

use plotters::style::{register_font, FontStyle};

use crate::error::QuoteError;

pub const FONT_FAMILY: &str = "sans-serif";

static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();

pub(crate) fn ensure_registered() -> Result<(), QuoteError> {
    REGISTERED
        .get_or_init(|| {
            register_font(
                FONT_FAMILY,
                FontStyle::Normal,
                epaint_default_fonts::UBUNTU_LIGHT,
            )
            .map_err(|_| "embedded chart font is not a valid TrueType font".to_string())
        })
        .clone()
        .map_err(QuoteError::Render)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_idempotent() {
        ensure_registered().unwrap();
        ensure_registered().unwrap();
    }
}
