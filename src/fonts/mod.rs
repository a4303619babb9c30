//! Font metrics for text measurement.
//!
//! Layout only needs advance widths. The [`FontMetrics`] trait is the seam
//! where a document adapter can plug in metrics for embedded fonts; the
//! crate ships [`StandardFontMetrics`] for the standard Type 1 fonts.

mod standard;

pub use standard::StandardFontMetrics;

use crate::error::{Error, Result};

/// Source of glyph advance widths.
pub trait FontMetrics {
    /// Whether metrics exist for the named font.
    fn has_font(&self, font: &str) -> bool;

    /// Advance width of `ch` in 1/1000 em, or `None` if unknown.
    fn glyph_width(&self, font: &str, ch: char) -> Option<f64>;

    /// Advance width of `text` at `size` points.
    ///
    /// Fails with [`Error::ResourceError`] if the font or any glyph has no
    /// metrics.
    fn text_width(&self, font: &str, size: f64, text: &str) -> Result<f64> {
        if !self.has_font(font) {
            return Err(Error::ResourceError(format!("no metrics for font '{}'", font)));
        }
        let mut units = 0.0;
        for ch in text.chars() {
            units += self.glyph_width(font, ch).ok_or_else(|| {
                Error::ResourceError(format!("no metrics for {:?} in font '{}'", ch, font))
            })?;
        }
        Ok(units * size / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DigitsOnly;

    impl FontMetrics for DigitsOnly {
        fn has_font(&self, font: &str) -> bool {
            font == "Digits"
        }

        fn glyph_width(&self, _font: &str, ch: char) -> Option<f64> {
            ch.is_ascii_digit().then_some(500.0)
        }
    }

    #[test]
    fn test_default_text_width() {
        assert_eq!(DigitsOnly.text_width("Digits", 10.0, "123").unwrap(), 15.0);
    }

    #[test]
    fn test_unknown_glyph() {
        let err = DigitsOnly.text_width("Digits", 10.0, "1a").unwrap_err();
        assert!(matches!(err, Error::ResourceError(_)));
    }

    #[test]
    fn test_unknown_font() {
        let err = DigitsOnly.text_width("Other", 10.0, "1").unwrap_err();
        assert!(matches!(err, Error::ResourceError(_)));
    }
}
