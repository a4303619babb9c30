//! Content stream operators and serialization.
//!
//! Appearance streams are built as a list of [`ContentStreamOp`]s and
//! only turned into bytes at assembly time, so generated streams can be
//! inspected structurally.

use crate::error::Result;
use crate::geometry::Matrix;
use crate::style::{Color, LineCap, LineJoin};
use std::io::Write;

/// Operations that can appear in an appearance stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Concatenate matrix (cm)
    Transform(f64, f64, f64, f64, f64, f64),
    /// Set graphics state from ExtGState dictionary (gs)
    SetExtGState(String),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font and size (Tf)
    SetFont(String, f64),
    /// Set text matrix (Tm)
    SetTextMatrix(f64, f64, f64, f64, f64, f64),
    /// Show text (Tj), already encoded as single-byte codes
    ShowText(Vec<u8>),
    /// Set fill color RGB (rg)
    SetFillColorRGB(f64, f64, f64),
    /// Set stroke color RGB (RG)
    SetStrokeColorRGB(f64, f64, f64),
    /// Set line width (w)
    SetLineWidth(f64),
    /// Set line cap style (J)
    SetLineCap(LineCap),
    /// Set line join style (j)
    SetLineJoin(LineJoin),
    /// Set miter limit (M)
    SetMiterLimit(f64),
    /// Set dash pattern (d)
    SetDashPattern(Vec<f64>, f64),
    /// Move to (m)
    MoveTo(f64, f64),
    /// Line to (l)
    LineTo(f64, f64),
    /// Curve to (c)
    CurveTo(f64, f64, f64, f64, f64, f64),
    /// Rectangle (re)
    Rectangle(f64, f64, f64, f64),
    /// Close path (h)
    ClosePath,
    /// Stroke (S)
    Stroke,
    /// Fill (f)
    Fill,
    /// Fill and stroke (B)
    FillStroke,
    /// Paint XObject (Do)
    PaintXObject(String),
}

impl ContentStreamOp {
    /// Whether this operator paints a path.
    pub fn is_paint(&self) -> bool {
        matches!(self, ContentStreamOp::Stroke | ContentStreamOp::Fill | ContentStreamOp::FillStroke)
    }
}

/// Builder for content streams.
#[derive(Debug, Clone, Default)]
pub struct ContentStreamBuilder {
    operations: Vec<ContentStreamOp>,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Add multiple operations.
    pub fn ops(&mut self, ops: impl IntoIterator<Item = ContentStreamOp>) -> &mut Self {
        self.operations.extend(ops);
        self
    }

    /// Save graphics state.
    pub fn save_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::SaveState)
    }

    /// Restore graphics state.
    pub fn restore_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::RestoreState)
    }

    /// Concatenate a matrix onto the CTM.
    pub fn transform(&mut self, m: &Matrix) -> &mut Self {
        self.op(ContentStreamOp::Transform(m.a, m.b, m.c, m.d, m.e, m.f))
    }

    /// Set the fill color.
    pub fn fill_color(&mut self, color: Color) -> &mut Self {
        self.op(ContentStreamOp::SetFillColorRGB(color.r, color.g, color.b))
    }

    /// Set the stroke color.
    pub fn stroke_color(&mut self, color: Color) -> &mut Self {
        self.op(ContentStreamOp::SetStrokeColorRGB(color.r, color.g, color.b))
    }

    /// Set line width.
    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.op(ContentStreamOp::SetLineWidth(width))
    }

    /// Move to.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(ContentStreamOp::MoveTo(x, y))
    }

    /// Line to.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(ContentStreamOp::LineTo(x, y))
    }

    /// Cubic Bezier curve.
    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> &mut Self {
        self.op(ContentStreamOp::CurveTo(x1, y1, x2, y2, x3, y3))
    }

    /// Rectangle path.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.op(ContentStreamOp::Rectangle(x, y, width, height))
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) -> &mut Self {
        self.op(ContentStreamOp::ClosePath)
    }

    /// Ellipse from four Bezier arcs, `kappa` being the control-point ratio.
    pub fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, kappa: f64) -> &mut Self {
        let ox = rx * kappa;
        let oy = ry * kappa;
        self.move_to(cx + rx, cy)
            .curve_to(cx + rx, cy + oy, cx + ox, cy + ry, cx, cy + ry)
            .curve_to(cx - ox, cy + ry, cx - rx, cy + oy, cx - rx, cy)
            .curve_to(cx - rx, cy - oy, cx - ox, cy - ry, cx, cy - ry)
            .curve_to(cx + ox, cy - ry, cx + rx, cy - oy, cx + rx, cy)
            .close_path()
    }

    /// Operations added so far.
    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    /// Take the operations, leaving the builder empty.
    pub fn into_operations(self) -> Vec<ContentStreamOp> {
        self.operations
    }

    /// Build the content stream to bytes.
    pub fn build(&self) -> Result<Vec<u8>> {
        encode_operations(&self.operations)
    }
}

/// Serialize operations, one per line.
pub fn encode_operations(operations: &[ContentStreamOp]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    for op in operations {
        write_op(&mut buf, op)?;
        writeln!(buf)?;
    }
    Ok(buf)
}

/// Format a number compactly: at most four decimals, no trailing zeros.
pub fn format_number(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn write_nums<W: Write>(w: &mut W, nums: &[f64]) -> std::io::Result<()> {
    for n in nums {
        write!(w, "{} ", format_number(*n))?;
    }
    Ok(())
}

fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
    match op {
        ContentStreamOp::SaveState => write!(w, "q"),
        ContentStreamOp::RestoreState => write!(w, "Q"),
        ContentStreamOp::Transform(a, b, c, d, e, f) => {
            write_nums(w, &[*a, *b, *c, *d, *e, *f])?;
            write!(w, "cm")
        },
        ContentStreamOp::SetExtGState(name) => write!(w, "/{} gs", name),
        ContentStreamOp::BeginText => write!(w, "BT"),
        ContentStreamOp::EndText => write!(w, "ET"),
        ContentStreamOp::SetFont(name, size) => write!(w, "/{} {} Tf", name, format_number(*size)),
        ContentStreamOp::SetTextMatrix(a, b, c, d, e, f) => {
            write_nums(w, &[*a, *b, *c, *d, *e, *f])?;
            write!(w, "Tm")
        },
        ContentStreamOp::ShowText(bytes) => {
            write!(w, "(")?;
            write_escaped_string(w, bytes)?;
            write!(w, ") Tj")
        },
        ContentStreamOp::SetFillColorRGB(r, g, b) => {
            write_nums(w, &[*r, *g, *b])?;
            write!(w, "rg")
        },
        ContentStreamOp::SetStrokeColorRGB(r, g, b) => {
            write_nums(w, &[*r, *g, *b])?;
            write!(w, "RG")
        },
        ContentStreamOp::SetLineWidth(width) => write!(w, "{} w", format_number(*width)),
        ContentStreamOp::SetLineCap(cap) => write!(w, "{} J", *cap as u8),
        ContentStreamOp::SetLineJoin(join) => write!(w, "{} j", *join as u8),
        ContentStreamOp::SetMiterLimit(limit) => write!(w, "{} M", format_number(*limit)),
        ContentStreamOp::SetDashPattern(pattern, phase) => {
            let parts: Vec<String> = pattern.iter().map(|p| format_number(*p)).collect();
            write!(w, "[{}] {} d", parts.join(" "), format_number(*phase))
        },
        ContentStreamOp::MoveTo(x, y) => {
            write_nums(w, &[*x, *y])?;
            write!(w, "m")
        },
        ContentStreamOp::LineTo(x, y) => {
            write_nums(w, &[*x, *y])?;
            write!(w, "l")
        },
        ContentStreamOp::CurveTo(x1, y1, x2, y2, x3, y3) => {
            write_nums(w, &[*x1, *y1, *x2, *y2, *x3, *y3])?;
            write!(w, "c")
        },
        ContentStreamOp::Rectangle(x, y, width, height) => {
            write_nums(w, &[*x, *y, *width, *height])?;
            write!(w, "re")
        },
        ContentStreamOp::ClosePath => write!(w, "h"),
        ContentStreamOp::Stroke => write!(w, "S"),
        ContentStreamOp::Fill => write!(w, "f"),
        ContentStreamOp::FillStroke => write!(w, "B"),
        ContentStreamOp::PaintXObject(name) => write!(w, "/{} Do", name),
    }
}

/// Write an escaped PDF literal string body.
pub(crate) fn write_escaped_string<W: Write>(w: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    for &byte in bytes {
        match byte {
            b'(' => write!(w, "\\(")?,
            b')' => write!(w, "\\)")?,
            b'\\' => write!(w, "\\\\")?,
            b'\n' => write!(w, "\\n")?,
            b'\r' => write!(w, "\\r")?,
            b'\t' => write!(w, "\\t")?,
            _ => w.write_all(&[byte])?,
        }
    }
    Ok(())
}

/// Encode text for a standard font with WinAnsiEncoding.
///
/// Characters with no WinAnsi code are replaced by `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| {
            win_ansi_code(ch).unwrap_or_else(|| {
                log::warn!("character {:?} has no WinAnsi code, replaced with '?'", ch);
                b'?'
            })
        })
        .collect()
}

fn win_ansi_code(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match ch {
            '\u{20AC}' => Some(0x80),
            '\u{201A}' => Some(0x82),
            '\u{0192}' => Some(0x83),
            '\u{201E}' => Some(0x84),
            '\u{2026}' => Some(0x85),
            '\u{2020}' => Some(0x86),
            '\u{2021}' => Some(0x87),
            '\u{02C6}' => Some(0x88),
            '\u{2030}' => Some(0x89),
            '\u{0160}' => Some(0x8A),
            '\u{2039}' => Some(0x8B),
            '\u{0152}' => Some(0x8C),
            '\u{017D}' => Some(0x8E),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '\u{2022}' => Some(0x95),
            '\u{2013}' => Some(0x96),
            '\u{2014}' => Some(0x97),
            '\u{02DC}' => Some(0x98),
            '\u{2122}' => Some(0x99),
            '\u{0161}' => Some(0x9A),
            '\u{203A}' => Some(0x9B),
            '\u{0153}' => Some(0x9C),
            '\u{017E}' => Some(0x9E),
            '\u{0178}' => Some(0x9F),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(ops: &[ContentStreamOp]) -> String {
        String::from_utf8(encode_operations(ops).unwrap()).unwrap()
    }

    #[test]
    fn test_simple_text() {
        let content = render(&[
            ContentStreamOp::BeginText,
            ContentStreamOp::SetFont("F1".to_string(), 12.0),
            ContentStreamOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, 72.0, 720.5),
            ContentStreamOp::ShowText(encode_win_ansi("Hello (World)")),
            ContentStreamOp::EndText,
        ]);
        assert_eq!(content, "BT\n/F1 12 Tf\n1 0 0 1 72 720.5 Tm\n(Hello \\(World\\)) Tj\nET\n");
    }

    #[test]
    fn test_path_operations() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .stroke_color(Color::black())
            .set_line_width(1.5)
            .move_to(0.0, 0.0)
            .line_to(100.0, 100.0)
            .op(ContentStreamOp::Stroke);
        let content = String::from_utf8(builder.build().unwrap()).unwrap();
        assert!(content.contains("0 0 0 RG"));
        assert!(content.contains("1.5 w"));
        assert!(content.contains("0 0 m"));
        assert!(content.contains("100 100 l"));
        assert!(content.ends_with("S\n"));
    }

    #[test]
    fn test_line_style_operators() {
        let content = render(&[
            ContentStreamOp::SetLineCap(LineCap::Round),
            ContentStreamOp::SetLineJoin(LineJoin::Bevel),
            ContentStreamOp::SetMiterLimit(4.0),
            ContentStreamOp::SetDashPattern(vec![3.0, 1.5], 0.0),
        ]);
        assert_eq!(content, "1 J\n2 j\n4 M\n[3 1.5] 0 d\n");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
        assert_eq!(format_number(-0.00001), "0");
        assert_eq!(format_number(-12.25), "-12.25");
    }

    #[test]
    fn test_ellipse_has_four_arcs() {
        let mut builder = ContentStreamBuilder::new();
        builder.ellipse(50.0, 50.0, 20.0, 10.0, 0.5522847498);
        let ops = builder.into_operations();
        assert_eq!(ops.first(), Some(&ContentStreamOp::MoveTo(70.0, 50.0)));
        assert_eq!(ops.iter().filter(|op| matches!(op, ContentStreamOp::CurveTo(..))).count(), 4);
        assert_eq!(ops.last(), Some(&ContentStreamOp::ClosePath));
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(encode_win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("\u{20AC}5"), vec![0x80, b'5']);
        assert_eq!(encode_win_ansi("\u{4E2D}"), vec![b'?']);
    }
}
