//! Multi-line text layout inside a rectangle.
//!
//! Text is split on explicit line breaks (`\n`, `\r\n`, or a standalone
//! `\\` token), optionally word-wrapped to the rectangle width, then
//! positioned line by line. Coordinates are in the
//! same space as the rectangle, y up; each line's `y` is its baseline.
//!
//! ```text
//! block_top ----------------------------
//!   baseline 0 = block_top - size
//!   baseline 1 = baseline 0 - size * spacing
//!   ...
//! ```
//!
//! The block may overflow the rectangle; nothing is clipped here.

use crate::error::Result;
use crate::fonts::FontMetrics;
use crate::geometry::Rect;
use crate::style::{Style, TextAlign, TextBaseline};

/// Inline line-break token, recognized only when surrounded by whitespace.
const LINE_BREAK_MARKER: &str = r"\\";

/// A measured line before positioning.
#[derive(Debug, Clone, PartialEq)]
struct MeasuredLine {
    text: String,
    width: f64,
}

/// A laid-out line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedLine<'a> {
    /// Line text, without trailing break
    pub text: &'a str,
    /// Left edge of the line
    pub x: f64,
    /// Baseline
    pub y: f64,
    /// Measured advance width
    pub width: f64,
}

/// Text broken into lines and placed in a rectangle.
///
/// Measurement happens once in [`TextLayout::new`]; positions are computed
/// on demand by [`TextLayout::lines`], which can be called any number of
/// times and always yields the same sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    lines: Vec<MeasuredLine>,
    rect: Rect,
    font_size: f64,
    leading: f64,
    align: TextAlign,
    baseline: TextBaseline,
}

impl TextLayout {
    /// Lay out `text` with the font, size, alignment and wrapping of `style`.
    ///
    /// `line_spacing` is the leading factor; baselines are
    /// `font_size * line_spacing` apart.
    pub fn new(
        text: &str,
        style: &Style,
        rect: Rect,
        metrics: &dyn FontMetrics,
        line_spacing: f64,
    ) -> Result<Self> {
        let font = style.font();
        let size = style.font_size();
        let mut lines = Vec::new();

        if !text.is_empty() {
            for raw in explicit_lines(text) {
                if style.wrap_text() {
                    wrap_line(raw, font, size, rect.width, metrics, &mut lines)?;
                } else {
                    let text = expand_whitespace(raw);
                    lines.push(MeasuredLine {
                        width: metrics.text_width(font, size, &text)?,
                        text,
                    });
                }
            }
        }

        log::trace!("laid out {} line(s) of {} {}pt text", lines.len(), font, size);

        Ok(Self {
            lines,
            rect,
            font_size: size,
            leading: size * line_spacing,
            align: style.text_align(),
            baseline: style.text_baseline(),
        })
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Height of the whole block.
    pub fn block_height(&self) -> f64 {
        self.lines.len() as f64 * self.leading
    }

    /// Positioned lines, top to bottom.
    pub fn lines(&self) -> PositionedLines<'_> {
        let block_top = match self.baseline {
            TextBaseline::Top => self.rect.top(),
            TextBaseline::Middle => self.rect.center().y + self.block_height() / 2.0,
            TextBaseline::Bottom => self.rect.bottom() + self.block_height(),
        };
        PositionedLines {
            layout: self,
            first_baseline: block_top - self.font_size,
            index: 0,
        }
    }

    fn line_x(&self, width: f64) -> f64 {
        match self.align {
            TextAlign::Left => self.rect.left(),
            TextAlign::Center => self.rect.left() + (self.rect.width - width) / 2.0,
            TextAlign::Right => self.rect.right() - width,
        }
    }
}

/// Lines separated by `\n`, `\r\n` or a standalone [`LINE_BREAK_MARKER`].
fn explicit_lines(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut start = 0;
        for (idx, _) in line.match_indices(LINE_BREAK_MARKER) {
            let end = idx + LINE_BREAK_MARKER.len();
            let before = line[..idx].chars().next_back();
            let after = line[end..].chars().next();
            if before.map_or(true, char::is_whitespace) && after.map_or(true, char::is_whitespace) {
                let segment = &line[start..idx];
                out.push(if start == 0 { segment.trim_end() } else { segment.trim() });
                start = end;
            }
        }
        out.push(if start == 0 { line } else { line[start..].trim_start() });
    }
    out
}

/// Replace tabs and other whitespace controls with plain spaces.
fn expand_whitespace(line: &str) -> String {
    line.chars()
        .map(|c| if c.is_whitespace() && c.is_control() { ' ' } else { c })
        .collect()
}

/// Greedy word packing. A word wider than `max_width` sits alone on its line.
fn wrap_line(
    line: &str,
    font: &str,
    size: f64,
    max_width: f64,
    metrics: &dyn FontMetrics,
    out: &mut Vec<MeasuredLine>,
) -> Result<()> {
    let space = metrics.text_width(font, size, " ")?;
    let mut current = String::new();
    let mut current_width = 0.0;

    for word in line.split_whitespace() {
        let word_width = metrics.text_width(font, size, word)?;
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        } else {
            out.push(MeasuredLine {
                text: std::mem::take(&mut current),
                width: current_width,
            });
            current.push_str(word);
            current_width = word_width;
        }
    }

    // blank input lines still take vertical space
    out.push(MeasuredLine {
        text: current,
        width: current_width,
    });
    Ok(())
}

/// Iterator over the lines of a [`TextLayout`].
#[derive(Debug, Clone)]
pub struct PositionedLines<'a> {
    layout: &'a TextLayout,
    first_baseline: f64,
    index: usize,
}

impl<'a> Iterator for PositionedLines<'a> {
    type Item = PositionedLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.layout.lines.get(self.index)?;
        let y = self.first_baseline - self.index as f64 * self.layout.leading;
        self.index += 1;
        Some(PositionedLine {
            text: &line.text,
            x: self.layout.line_x(line.width),
            y,
            width: line.width,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.layout.lines.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PositionedLines<'_> {}
