//! Advance widths for the standard Type 1 fonts.
//!
//! Widths are the published AFM values in units of 1/1000 em for the
//! printable ASCII range. Other printable characters fall back to the
//! font's typical lowercase advance.

use super::FontMetrics;

/// Printable ASCII, 0x20 through 0x7E.
const FIRST_CHAR: u32 = 0x20;
const LAST_CHAR: u32 = 0x7E;

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[rustfmt::skip]
static TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

#[rustfmt::skip]
static TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

#[rustfmt::skip]
static TIMES_ITALIC_WIDTHS: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 675, 675, 675, 500, 920,
    611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833,
    667, 722, 611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556,
    389, 278, 389, 422, 500, 333,
    500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722,
    500, 500, 500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389,
    400, 275, 400, 541,
];

#[rustfmt::skip]
static TIMES_BOLD_ITALIC_WIDTHS: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 832,
    667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889,
    722, 722, 611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611,
    333, 278, 333, 570, 500, 333,
    500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778,
    556, 500, 500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389,
    348, 220, 348, 570,
];

/// Width data for one font.
#[derive(Debug, Clone, Copy)]
enum FontWidths {
    /// Proportional font with a per-character table and fallback
    Proportional(&'static [u16; 95], f64),
    /// Monospace font with fixed width
    Monospace(f64),
}

impl FontWidths {
    fn for_font(name: &str) -> Option<Self> {
        match name {
            "Helvetica" | "Helvetica-Oblique" => Some(FontWidths::Proportional(&HELVETICA_WIDTHS, 556.0)),
            "Helvetica-Bold" | "Helvetica-BoldOblique" => {
                Some(FontWidths::Proportional(&HELVETICA_BOLD_WIDTHS, 556.0))
            },
            "Times-Roman" => Some(FontWidths::Proportional(&TIMES_ROMAN_WIDTHS, 500.0)),
            "Times-Bold" => Some(FontWidths::Proportional(&TIMES_BOLD_WIDTHS, 500.0)),
            "Times-Italic" => Some(FontWidths::Proportional(&TIMES_ITALIC_WIDTHS, 500.0)),
            "Times-BoldItalic" => Some(FontWidths::Proportional(&TIMES_BOLD_ITALIC_WIDTHS, 500.0)),
            "Courier" | "Courier-Bold" | "Courier-Oblique" | "Courier-BoldOblique" => {
                Some(FontWidths::Monospace(600.0))
            },
            _ => None,
        }
    }

    fn width_for_char(&self, ch: char) -> Option<f64> {
        // tabs and other whitespace controls advance like a space
        let ch = if ch.is_whitespace() { ' ' } else { ch };
        if ch.is_control() {
            return None;
        }
        match self {
            FontWidths::Proportional(table, fallback) => {
                let code = ch as u32;
                if (FIRST_CHAR..=LAST_CHAR).contains(&code) {
                    Some(f64::from(table[(code - FIRST_CHAR) as usize]))
                } else {
                    Some(*fallback)
                }
            },
            FontWidths::Monospace(width) => Some(*width),
        }
    }
}

/// Metrics for the Helvetica, Times and Courier families.
///
/// Symbol and ZapfDingbats have no WinAnsi glyph set and are not listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFontMetrics;

impl StandardFontMetrics {
    /// Names of the fonts with built-in metrics.
    pub const FONTS: &'static [&'static str] = &[
        "Helvetica",
        "Helvetica-Bold",
        "Helvetica-Oblique",
        "Helvetica-BoldOblique",
        "Times-Roman",
        "Times-Bold",
        "Times-Italic",
        "Times-BoldItalic",
        "Courier",
        "Courier-Bold",
        "Courier-Oblique",
        "Courier-BoldOblique",
    ];
}

impl FontMetrics for StandardFontMetrics {
    fn has_font(&self, font: &str) -> bool {
        FontWidths::for_font(font).is_some()
    }

    fn glyph_width(&self, font: &str, ch: char) -> Option<f64> {
        FontWidths::for_font(font)?.width_for_char(ch)
    }
}
