//! Visual style of an annotation.
//!
//! A [`Style`] is an immutable value. New styles are produced with
//! [`Style::derive`], which copies every field the [`StyleOverrides`] leave
//! unset and validates the result.
//!
//! ```
//! use pdf_annotate::style::{Color, Style, StyleOverrides};
//!
//! let base = Style::default();
//! let thick = base
//!     .derive(StyleOverrides::new().with_stroke_width(5.0).with_fill(Color::rgb(1.0, 0.0, 0.0)))
//!     .unwrap();
//! assert_eq!(thick.stroke_width(), 5.0);
//! assert_eq!(thick.font(), "Helvetica");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;

/// An RGB color with optional alpha, channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct Color {
    /// Red channel
    pub r: f64,
    /// Green channel
    pub g: f64,
    /// Blue channel
    pub b: f64,
    /// Alpha, if the color was given with 4 components
    pub a: Option<f64>,
}

impl Color {
    /// Opaque RGB color.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: None }
    }

    /// RGB color with alpha.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: Some(a),
        }
    }

    /// Black.
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Build a color from 3 (RGB) or 4 (RGBA) components.
    pub fn from_components(components: &[f64]) -> Result<Self> {
        let color = match *components {
            [r, g, b] => Color::rgb(r, g, b),
            [r, g, b, a] => Color::rgba(r, g, b, a),
            _ => {
                return Err(Error::InvalidStyle(format!(
                    "color needs 3 or 4 components, got {}",
                    components.len()
                )))
            },
        };
        color.validate("color")?;
        Ok(color)
    }

    fn validate(&self, what: &str) -> Result<()> {
        let channels = [Some(self.r), Some(self.g), Some(self.b), self.a];
        if channels.iter().flatten().all(|c| unit_interval(*c)) {
            Ok(())
        } else {
            Err(Error::InvalidStyle(format!("{} channels must be within [0, 1]: {:?}", what, self)))
        }
    }
}

impl TryFrom<Vec<f64>> for Color {
    type Error = Error;

    fn try_from(components: Vec<f64>) -> Result<Self> {
        Color::from_components(&components)
    }
}

fn unit_interval(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush with the left edge
    #[default]
    Left,
    /// Centred
    Center,
    /// Flush with the right edge
    Right,
}

impl TextAlign {
    /// Value of the `/Q` quadding entry.
    pub fn quadding(self) -> i64 {
        match self {
            TextAlign::Left => 0,
            TextAlign::Center => 1,
            TextAlign::Right => 2,
        }
    }
}

/// Vertical placement of a text block inside its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    /// Block top at the rectangle top
    Top,
    /// Block centred vertically
    #[default]
    Middle,
    /// Block bottom at the rectangle bottom
    Bottom,
}

/// Line cap styles for path stroking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    /// Square butt cap (default)
    #[default]
    Butt = 0,
    /// Round cap
    Round = 1,
    /// Projecting square cap
    Square = 2,
}

/// Line join styles for path stroking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    /// Miter join (default)
    #[default]
    Miter = 0,
    /// Round join
    Round = 1,
    /// Bevel join
    Bevel = 2,
}

/// Stroke dash pattern (`[array] phase d`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashPattern {
    /// Alternating dash and gap lengths
    pub array: Vec<f64>,
    /// Offset into the pattern
    #[serde(default)]
    pub phase: f64,
}

impl DashPattern {
    /// Create a dash pattern.
    pub fn new(array: Vec<f64>, phase: f64) -> Self {
        Self { array, phase }
    }

    fn validate(&self) -> Result<()> {
        if self.array.iter().any(|v| !v.is_finite() || *v < 0.0) || !self.phase.is_finite() {
            return Err(Error::InvalidStyle(format!("invalid dash pattern {:?}", self.array)));
        }
        if self.array.is_empty() || self.array.iter().all(|v| *v == 0.0) {
            return Err(Error::InvalidStyle("dash pattern cannot be all zero".to_string()));
        }
        Ok(())
    }
}

/// Immutable style record.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    stroke_color: Color,
    stroke_width: f64,
    fill: Option<Color>,
    stroke_transparency: Option<f64>,
    fill_transparency: Option<f64>,
    dash: Option<DashPattern>,
    line_cap: Option<LineCap>,
    line_join: Option<LineJoin>,
    miter_limit: Option<f64>,
    content: Arc<str>,
    font: Arc<str>,
    font_size: f64,
    text_align: TextAlign,
    text_baseline: TextBaseline,
    line_spacing: Option<f64>,
    wrap_text: bool,
    image: Option<Arc<str>>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: Color::black(),
            stroke_width: 1.0,
            fill: None,
            stroke_transparency: None,
            fill_transparency: None,
            dash: None,
            line_cap: None,
            line_join: None,
            miter_limit: None,
            content: Arc::from(""),
            font: Arc::from("Helvetica"),
            font_size: 12.0,
            text_align: TextAlign::Left,
            text_baseline: TextBaseline::Middle,
            line_spacing: None,
            wrap_text: false,
            image: None,
        }
    }
}

impl Style {
    /// Style with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a style from the defaults plus overrides.
    pub fn from_overrides(overrides: StyleOverrides) -> Result<Self> {
        Self::default().derive(overrides)
    }

    /// New style with the given fields replaced. The receiver is unchanged.
    pub fn derive(&self, overrides: StyleOverrides) -> Result<Style> {
        let StyleOverrides {
            stroke_color,
            stroke_width,
            fill,
            stroke_transparency,
            fill_transparency,
            dash,
            line_cap,
            line_join,
            miter_limit,
            content,
            font,
            font_size,
            text_align,
            text_baseline,
            line_spacing,
            wrap_text,
            image,
        } = overrides;

        let style = Style {
            stroke_color: stroke_color.unwrap_or(self.stroke_color),
            stroke_width: stroke_width.unwrap_or(self.stroke_width),
            fill: fill.unwrap_or(self.fill),
            stroke_transparency: stroke_transparency.or(self.stroke_transparency),
            fill_transparency: fill_transparency.or(self.fill_transparency),
            dash: dash.or_else(|| self.dash.clone()),
            line_cap: line_cap.or(self.line_cap),
            line_join: line_join.or(self.line_join),
            miter_limit: miter_limit.or(self.miter_limit),
            content: content.map(Arc::from).unwrap_or_else(|| Arc::clone(&self.content)),
            font: font.map(Arc::from).unwrap_or_else(|| Arc::clone(&self.font)),
            font_size: font_size.unwrap_or(self.font_size),
            text_align: text_align.unwrap_or(self.text_align),
            text_baseline: text_baseline.unwrap_or(self.text_baseline),
            line_spacing: line_spacing.or(self.line_spacing),
            wrap_text: wrap_text.unwrap_or(self.wrap_text),
            image: match image {
                Some(image) => Some(Arc::from(image)),
                None => self.image.clone(),
            },
        };
        style.validate()?;
        Ok(style)
    }

    fn validate(&self) -> Result<()> {
        self.stroke_color.validate("stroke color")?;
        if let Some(fill) = &self.fill {
            fill.validate("fill color")?;
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(Error::InvalidStyle(format!(
                "stroke width must be a non-negative number, got {}",
                self.stroke_width
            )));
        }
        for (name, value) in [
            ("stroke transparency", self.stroke_transparency),
            ("fill transparency", self.fill_transparency),
        ] {
            if let Some(v) = value {
                if !unit_interval(v) {
                    return Err(Error::InvalidStyle(format!("{} must be within [0, 1], got {}", name, v)));
                }
            }
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(Error::InvalidStyle(format!("font size must be positive, got {}", self.font_size)));
        }
        if let Some(spacing) = self.line_spacing {
            if !spacing.is_finite() || spacing <= 0.0 {
                return Err(Error::InvalidStyle(format!("line spacing must be positive, got {}", spacing)));
            }
        }
        if let Some(limit) = self.miter_limit {
            if !limit.is_finite() || limit < 1.0 {
                return Err(Error::InvalidStyle(format!("miter limit must be at least 1, got {}", limit)));
            }
        }
        if let Some(dash) = &self.dash {
            dash.validate()?;
        }
        Ok(())
    }

    /// Stroke color.
    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    /// Stroke width in caller units.
    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    /// Fill color, if any.
    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    /// Dash pattern, if any.
    pub fn dash(&self) -> Option<&DashPattern> {
        self.dash.as_ref()
    }

    /// Line cap, if set.
    pub fn line_cap(&self) -> Option<LineCap> {
        self.line_cap
    }

    /// Line join, if set.
    pub fn line_join(&self) -> Option<LineJoin> {
        self.line_join
    }

    /// Miter limit, if set.
    pub fn miter_limit(&self) -> Option<f64> {
        self.miter_limit
    }

    /// Text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Font name.
    pub fn font(&self) -> &str {
        &self.font
    }

    /// Font size in points.
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Horizontal text alignment.
    pub fn text_align(&self) -> TextAlign {
        self.text_align
    }

    /// Vertical text placement.
    pub fn text_baseline(&self) -> TextBaseline {
        self.text_baseline
    }

    /// Line spacing factor, if set.
    pub fn line_spacing(&self) -> Option<f64> {
        self.line_spacing
    }

    /// Whether text is wrapped to the rectangle width.
    pub fn wrap_text(&self) -> bool {
        self.wrap_text
    }

    /// Image identifier, if any.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Effective stroke opacity: explicit transparency, then color alpha, then 1.
    pub fn stroke_alpha(&self) -> f64 {
        self.stroke_transparency.or(self.stroke_color.a).unwrap_or(1.0)
    }

    /// Effective fill opacity: explicit transparency, then fill alpha, then 1.
    pub fn fill_alpha(&self) -> f64 {
        self.fill_transparency
            .or(self.fill.and_then(|c| c.a))
            .unwrap_or(1.0)
    }

    /// Color used for text: the fill if set, otherwise the stroke color.
    pub fn text_color(&self) -> Color {
        self.fill.unwrap_or(self.stroke_color)
    }

    /// Opacity used for text, taken from the same channel as [`Style::text_color`].
    pub fn text_alpha(&self) -> f64 {
        if self.fill.is_some() {
            self.fill_alpha()
        } else {
            self.stroke_alpha()
        }
    }
}

/// Field-by-field overrides for [`Style::derive`].
///
/// Unset fields keep the source value. `fill` is doubly optional so a
/// derived style can drop an inherited fill with [`StyleOverrides::no_fill`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleOverrides {
    /// Stroke color
    pub stroke_color: Option<Color>,
    /// Stroke width
    pub stroke_width: Option<f64>,
    /// Fill color (`Some(None)` removes the fill)
    #[serde(deserialize_with = "deserialize_some")]
    pub fill: Option<Option<Color>>,
    /// Stroke opacity
    pub stroke_transparency: Option<f64>,
    /// Fill opacity
    pub fill_transparency: Option<f64>,
    /// Dash pattern
    pub dash: Option<DashPattern>,
    /// Line cap
    pub line_cap: Option<LineCap>,
    /// Line join
    pub line_join: Option<LineJoin>,
    /// Miter limit
    pub miter_limit: Option<f64>,
    /// Text content
    pub content: Option<String>,
    /// Font name
    pub font: Option<String>,
    /// Font size
    pub font_size: Option<f64>,
    /// Horizontal alignment
    pub text_align: Option<TextAlign>,
    /// Vertical placement
    pub text_baseline: Option<TextBaseline>,
    /// Line spacing factor
    pub line_spacing: Option<f64>,
    /// Wrap text to the rectangle width
    pub wrap_text: Option<bool>,
    /// Image identifier
    pub image: Option<String>,
}

fn deserialize_some<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl StyleOverrides {
    /// Empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stroke color.
    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.stroke_color = Some(color);
        self
    }

    /// Set the stroke width.
    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    /// Set the fill color.
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(Some(color));
        self
    }

    /// Remove the fill.
    pub fn no_fill(mut self) -> Self {
        self.fill = Some(None);
        self
    }

    /// Set the stroke opacity.
    pub fn with_stroke_transparency(mut self, alpha: f64) -> Self {
        self.stroke_transparency = Some(alpha);
        self
    }

    /// Set the fill opacity.
    pub fn with_fill_transparency(mut self, alpha: f64) -> Self {
        self.fill_transparency = Some(alpha);
        self
    }

    /// Set the dash pattern.
    pub fn with_dash(mut self, array: Vec<f64>, phase: f64) -> Self {
        self.dash = Some(DashPattern::new(array, phase));
        self
    }

    /// Set the line cap.
    pub fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = Some(cap);
        self
    }

    /// Set the line join.
    pub fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = Some(join);
        self
    }

    /// Set the miter limit.
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = Some(limit);
        self
    }

    /// Set the text content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the font name.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set the horizontal alignment.
    pub fn with_text_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    /// Set the vertical placement.
    pub fn with_text_baseline(mut self, baseline: TextBaseline) -> Self {
        self.text_baseline = Some(baseline);
        self
    }

    /// Set the line spacing factor.
    pub fn with_line_spacing(mut self, spacing: f64) -> Self {
        self.line_spacing = Some(spacing);
        self
    }

    /// Enable or disable wrapping.
    pub fn with_wrap_text(mut self, wrap: bool) -> Self {
        self.wrap_text = Some(wrap);
        self
    }

    /// Set the image identifier.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
