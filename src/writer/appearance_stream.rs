//! Appearance stream generation for annotations.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.5.5 (Appearance Streams)
//!
//! Each annotation kind becomes a variant of [`Annotation`] holding only
//! the geometry its drawing needs. [`generate`] turns a variant plus a
//! [`Style`] into an [`AnnotationArtifact`]: the bounding box, the ordered
//! drawing operators, and the logical resources those operators name.
//!
//! Drawing happens in intrinsic page space, so the Form XObject's `/BBox`
//! equals the annotation `/Rect` and no `/Matrix` is needed. Text and
//! images are drawn in caller space under the page matrix so they appear
//! upright on rotated pages.
//!
//! # Example
//!
//! ```
//! use pdf_annotate::config::AnnotatorConfig;
//! use pdf_annotate::document::MemoryDocument;
//! use pdf_annotate::fonts::StandardFontMetrics;
//! use pdf_annotate::geometry::{normalize, Location, PageGeometry};
//! use pdf_annotate::style::Style;
//! use pdf_annotate::writer::appearance_stream::{generate, Annotation, AnnotationKind, RenderContext};
//!
//! let page = PageGeometry::new(612.0, 792.0, 0);
//! let geometry = normalize(&Location::rect(0, 10.0, 20.0, 50.0, 60.0), &page).unwrap();
//! let style = Style::default();
//! let annotation = Annotation::from_geometry(AnnotationKind::Square, &geometry, &style).unwrap();
//!
//! let config = AnnotatorConfig::default();
//! let images = MemoryDocument::new();
//! let ctx = RenderContext::new(&StandardFontMetrics, &images, &config);
//! let artifact = generate(&annotation, &style, &ctx).unwrap();
//! assert_eq!(artifact.bbox.to_array(), [10.0, 20.0, 50.0, 60.0]);
//! ```

use super::content_stream::{encode_operations, encode_win_ansi, ContentStreamBuilder, ContentStreamOp};
use super::graphics_state::AlphaState;
use crate::annotation_types::AnnotationSubtype;
use crate::config::AnnotatorConfig;
use crate::document::ImageSource;
use crate::error::{Error, Result};
use crate::fonts::FontMetrics;
use crate::geometry::{Matrix, NormalizedGeometry, Point, Rect, Shape};
use crate::style::{LineCap, LineJoin, Style};
use crate::text::TextLayout;
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// The eight supported annotation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// Rectangle
    Square,
    /// Ellipse inscribed in a rectangle
    Circle,
    /// Closed polygon
    Polygon,
    /// Open polyline
    Polyline,
    /// Single segment
    Line,
    /// Freehand stroke
    Ink,
    /// Raster image
    Image,
    /// Laid-out text
    Text,
}

impl AnnotationKind {
    /// Every kind, in a fixed order.
    pub const ALL: [AnnotationKind; 8] = [
        AnnotationKind::Square,
        AnnotationKind::Circle,
        AnnotationKind::Polygon,
        AnnotationKind::Polyline,
        AnnotationKind::Line,
        AnnotationKind::Ink,
        AnnotationKind::Image,
        AnnotationKind::Text,
    ];

    /// Kind name as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Square => "square",
            AnnotationKind::Circle => "circle",
            AnnotationKind::Polygon => "polygon",
            AnnotationKind::Polyline => "polyline",
            AnnotationKind::Line => "line",
            AnnotationKind::Ink => "ink",
            AnnotationKind::Image => "image",
            AnnotationKind::Text => "text",
        }
    }

    /// Annotation subtype written to the dictionary.
    pub fn subtype(&self) -> AnnotationSubtype {
        match self {
            AnnotationKind::Square => AnnotationSubtype::Square,
            AnnotationKind::Circle => AnnotationSubtype::Circle,
            AnnotationKind::Polygon => AnnotationSubtype::Polygon,
            AnnotationKind::Polyline => AnnotationSubtype::PolyLine,
            AnnotationKind::Line => AnnotationSubtype::Line,
            AnnotationKind::Ink => AnnotationSubtype::Ink,
            AnnotationKind::Image => AnnotationSubtype::Stamp,
            AnnotationKind::Text => AnnotationSubtype::FreeText,
        }
    }

    fn takes_rect(&self) -> bool {
        matches!(
            self,
            AnnotationKind::Square | AnnotationKind::Circle | AnnotationKind::Image | AnnotationKind::Text
        )
    }
}

impl FromStr for AnnotationKind {
    type Err = Error;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self> {
        AnnotationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnsupportedKind(s.to_string()))
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-space rectangle plus the matrix that maps it onto the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallerFrame {
    /// Rectangle in caller space
    pub rect: Rect,
    /// Caller-to-intrinsic matrix
    pub matrix: Matrix,
}

/// An annotation ready for appearance generation.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// Rectangle inscribed in `rect`
    Square {
        /// Intrinsic rectangle
        rect: Rect,
    },
    /// Ellipse inscribed in `rect`
    Circle {
        /// Intrinsic rectangle
        rect: Rect,
    },
    /// Closed path through at least three points
    Polygon {
        /// Intrinsic points
        points: Vec<Point>,
    },
    /// Open path
    Polyline {
        /// Intrinsic points
        points: Vec<Point>,
    },
    /// Single segment
    Line {
        /// Intrinsic start point
        start: Point,
        /// Intrinsic end point
        end: Point,
    },
    /// Freehand stroke, drawn as straight segments
    Ink {
        /// Intrinsic points
        points: Vec<Point>,
    },
    /// Image stretched over its rectangle
    Image {
        /// Intrinsic rectangle
        rect: Rect,
        /// Where the image is drawn
        frame: CallerFrame,
        /// Image identifier
        image: String,
    },
    /// Text laid out in its rectangle
    Text {
        /// Intrinsic rectangle
        rect: Rect,
        /// Where the text is laid out
        frame: CallerFrame,
    },
}

impl Annotation {
    /// Pick the variant for `kind`, checking the location shape fits it.
    pub fn from_geometry(kind: AnnotationKind, geometry: &NormalizedGeometry, style: &Style) -> Result<Self> {
        if kind.takes_rect() {
            let (rect, visual) = match (&geometry.shape, &geometry.visual) {
                (Shape::Rect(rect), Shape::Rect(visual)) => (*rect, *visual),
                _ => {
                    return Err(Error::InvalidGeometry(format!(
                        "'{}' annotations need a rectangle location",
                        kind
                    )))
                },
            };
            let frame = CallerFrame {
                rect: visual,
                matrix: geometry.matrix,
            };
            return Ok(match kind {
                AnnotationKind::Square => Annotation::Square { rect },
                AnnotationKind::Circle => Annotation::Circle { rect },
                AnnotationKind::Image => {
                    let image = style
                        .image()
                        .ok_or_else(|| Error::InvalidStyle("image annotations need an image".to_string()))?;
                    Annotation::Image {
                        rect,
                        frame,
                        image: image.to_string(),
                    }
                },
                _ => Annotation::Text { rect, frame },
            });
        }

        let points = match &geometry.shape {
            Shape::Points(points) => points.clone(),
            Shape::Rect(_) => {
                return Err(Error::InvalidGeometry(format!(
                    "'{}' annotations need a point-list location",
                    kind
                )))
            },
        };
        match kind {
            AnnotationKind::Polygon => {
                if points.len() < 3 {
                    return Err(Error::InvalidGeometry(format!(
                        "polygon needs at least 3 points, got {}",
                        points.len()
                    )));
                }
                Ok(Annotation::Polygon { points })
            },
            AnnotationKind::Line => match points.as_slice() {
                [start, end] => Ok(Annotation::Line {
                    start: *start,
                    end: *end,
                }),
                _ => Err(Error::InvalidGeometry(format!(
                    "line needs exactly 2 points, got {}",
                    points.len()
                ))),
            },
            AnnotationKind::Ink => Ok(Annotation::Ink { points }),
            _ => Ok(Annotation::Polyline { points }),
        }
    }

    /// Kind of this annotation.
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Square { .. } => AnnotationKind::Square,
            Annotation::Circle { .. } => AnnotationKind::Circle,
            Annotation::Polygon { .. } => AnnotationKind::Polygon,
            Annotation::Polyline { .. } => AnnotationKind::Polyline,
            Annotation::Line { .. } => AnnotationKind::Line,
            Annotation::Ink { .. } => AnnotationKind::Ink,
            Annotation::Image { .. } => AnnotationKind::Image,
            Annotation::Text { .. } => AnnotationKind::Text,
        }
    }

    /// Intrinsic-space bounding box, not padded by the stroke width.
    pub fn bbox(&self) -> Rect {
        match self {
            Annotation::Square { rect }
            | Annotation::Circle { rect }
            | Annotation::Image { rect, .. }
            | Annotation::Text { rect, .. } => *rect,
            Annotation::Line { start, end } => Rect::from_corners(start.x, start.y, end.x, end.y),
            Annotation::Polygon { points } | Annotation::Polyline { points } | Annotation::Ink { points } => {
                Rect::bounding(points).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
            },
        }
    }

    /// Vertices in intrinsic space, for point-list kinds.
    pub fn points(&self) -> Option<Vec<Point>> {
        match self {
            Annotation::Polygon { points } | Annotation::Polyline { points } | Annotation::Ink { points } => {
                Some(points.clone())
            },
            Annotation::Line { start, end } => Some(vec![*start, *end]),
            _ => None,
        }
    }
}

/// A logical resource referenced by an appearance stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// Standard font by base name
    Font(String),
    /// Image XObject by image identifier
    Image(String),
    /// Graphics state for an opacity pair
    GraphicsState(AlphaState),
}

impl ResourceKey {
    /// Resource dictionary category (`/Font`, `/XObject`, `/ExtGState`).
    pub fn category(&self) -> &'static str {
        match self {
            ResourceKey::Font(_) => "Font",
            ResourceKey::Image(_) => "XObject",
            ResourceKey::GraphicsState(_) => "ExtGState",
        }
    }
}

/// Output of appearance generation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationArtifact {
    /// Bounding box in intrinsic space
    pub bbox: Rect,
    /// Drawing operators
    pub operations: Vec<ContentStreamOp>,
    /// Stream-local resource names to logical resources
    pub resources: IndexMap<String, ResourceKey>,
}

impl AnnotationArtifact {
    fn empty(bbox: Rect) -> Self {
        Self {
            bbox,
            operations: Vec::new(),
            resources: IndexMap::new(),
        }
    }

    /// True when nothing is drawn.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Serialized content stream.
    pub fn content(&self) -> Result<Vec<u8>> {
        encode_operations(&self.operations)
    }
}

/// Lookups available while generating appearances.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Font metrics for text layout
    pub metrics: &'a dyn FontMetrics,
    /// Image dimensions
    pub images: &'a dyn ImageSource,
    /// Generation constants
    pub config: &'a AnnotatorConfig,
}

impl<'a> RenderContext<'a> {
    /// Create a render context.
    pub fn new(metrics: &'a dyn FontMetrics, images: &'a dyn ImageSource, config: &'a AnnotatorConfig) -> Self {
        Self {
            metrics,
            images,
            config,
        }
    }
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext").field("config", self.config).finish_non_exhaustive()
    }
}

const GS_NAME: &str = "GS1";
const FONT_NAME: &str = "F1";
const IMAGE_NAME: &str = "Im1";

/// Generate the appearance of an annotation.
pub fn generate(annotation: &Annotation, style: &Style, ctx: &RenderContext<'_>) -> Result<AnnotationArtifact> {
    let artifact = match annotation {
        Annotation::Square { rect } => {
            let paint = Paint::closed(style);
            let mut artifact = AnnotationArtifact::empty(*rect);
            if let Some(op) = paint.operator() {
                let inner = rect.inset(paint.inset(style));
                let mut b = paint.begin(style, &mut artifact.resources, false);
                b.rect(inner.x, inner.y, inner.width, inner.height).op(op).restore_state();
                artifact.operations = b.into_operations();
            }
            artifact
        },
        Annotation::Circle { rect } => {
            let paint = Paint::closed(style);
            let mut artifact = AnnotationArtifact::empty(*rect);
            if let Some(op) = paint.operator() {
                let inner = rect.inset(paint.inset(style));
                let c = rect.center();
                let mut b = paint.begin(style, &mut artifact.resources, false);
                b.ellipse(c.x, c.y, inner.width / 2.0, inner.height / 2.0, ctx.config.circle_kappa)
                    .op(op)
                    .restore_state();
                artifact.operations = b.into_operations();
            }
            artifact
        },
        Annotation::Polygon { points } => path_artifact(annotation.bbox(), points, true, Paint::closed(style), style, false),
        Annotation::Polyline { points } => path_artifact(annotation.bbox(), points, false, Paint::open(style), style, false),
        Annotation::Line { start, end } => {
            path_artifact(annotation.bbox(), &[*start, *end], false, Paint::open(style), style, false)
        },
        Annotation::Ink { points } => path_artifact(annotation.bbox(), points, false, Paint::open(style), style, true),
        Annotation::Image { rect, frame, image } => image_artifact(*rect, frame, image, style, ctx)?,
        Annotation::Text { rect, frame } => text_artifact(*rect, frame, style, ctx)?,
    };

    log::trace!(
        "generated {} operator(s), {} resource(s) for {} annotation",
        artifact.operations.len(),
        artifact.resources.len(),
        annotation.kind()
    );
    Ok(artifact)
}

/// Which parts of a path are painted.
#[derive(Debug, Clone, Copy)]
struct Paint {
    stroke: bool,
    fill: bool,
}

impl Paint {
    fn closed(style: &Style) -> Self {
        Self {
            stroke: style.stroke_width() > 0.0,
            fill: style.fill().is_some(),
        }
    }

    fn open(style: &Style) -> Self {
        Self {
            stroke: style.stroke_width() > 0.0,
            fill: false,
        }
    }

    fn operator(&self) -> Option<ContentStreamOp> {
        match (self.stroke, self.fill) {
            (true, true) => Some(ContentStreamOp::FillStroke),
            (true, false) => Some(ContentStreamOp::Stroke),
            (false, true) => Some(ContentStreamOp::Fill),
            (false, false) => None,
        }
    }

    /// Half the stroke width, so the stroke stays inside the rectangle.
    fn inset(&self, style: &Style) -> f64 {
        if self.stroke {
            style.stroke_width() / 2.0
        } else {
            0.0
        }
    }

    fn alpha(&self, style: &Style) -> AlphaState {
        AlphaState::new(
            if self.stroke { style.stroke_alpha() } else { 1.0 },
            if self.fill { style.fill_alpha() } else { 1.0 },
        )
    }

    /// Save state, then set opacity, colors and line style.
    fn begin(
        &self,
        style: &Style,
        resources: &mut IndexMap<String, ResourceKey>,
        round_by_default: bool,
    ) -> ContentStreamBuilder {
        let mut b = ContentStreamBuilder::new();
        b.save_state();
        push_alpha(&mut b, resources, self.alpha(style));
        if self.stroke {
            b.stroke_color(style.stroke_color()).set_line_width(style.stroke_width());
            let (cap, join) = if round_by_default {
                (Some(style.line_cap().unwrap_or(LineCap::Round)), Some(style.line_join().unwrap_or(LineJoin::Round)))
            } else {
                (style.line_cap(), style.line_join())
            };
            if let Some(cap) = cap {
                b.op(ContentStreamOp::SetLineCap(cap));
            }
            if let Some(join) = join {
                b.op(ContentStreamOp::SetLineJoin(join));
            }
            if let Some(limit) = style.miter_limit() {
                b.op(ContentStreamOp::SetMiterLimit(limit));
            }
            if let Some(dash) = style.dash() {
                b.op(ContentStreamOp::SetDashPattern(dash.array.clone(), dash.phase));
            }
        }
        if self.fill {
            if let Some(fill) = style.fill() {
                b.fill_color(fill);
            }
        }
        b
    }
}

fn push_alpha(b: &mut ContentStreamBuilder, resources: &mut IndexMap<String, ResourceKey>, alpha: AlphaState) {
    if alpha.is_translucent() {
        resources.insert(GS_NAME.to_string(), ResourceKey::GraphicsState(alpha));
        b.op(ContentStreamOp::SetExtGState(GS_NAME.to_string()));
    }
}

fn path_artifact(
    bbox: Rect,
    points: &[Point],
    closed: bool,
    paint: Paint,
    style: &Style,
    round_by_default: bool,
) -> AnnotationArtifact {
    let mut artifact = AnnotationArtifact::empty(bbox);
    let Some(op) = paint.operator() else {
        return artifact;
    };
    let mut b = paint.begin(style, &mut artifact.resources, round_by_default);
    if let Some((first, rest)) = points.split_first() {
        b.move_to(first.x, first.y);
        for p in rest {
            b.line_to(p.x, p.y);
        }
    }
    if closed {
        b.close_path();
    }
    b.op(op).restore_state();
    artifact.operations = b.into_operations();
    artifact
}

fn image_artifact(
    rect: Rect,
    frame: &CallerFrame,
    image: &str,
    style: &Style,
    ctx: &RenderContext<'_>,
) -> Result<AnnotationArtifact> {
    if ctx.images.image_dimensions(image).is_none() {
        return Err(Error::ResourceError(format!("dimensions of image '{}' are unavailable", image)));
    }

    let border = style.stroke_width() > 0.0;
    let mut artifact = AnnotationArtifact::empty(rect);
    let mut b = ContentStreamBuilder::new();
    b.save_state();
    push_alpha(
        &mut b,
        &mut artifact.resources,
        AlphaState::new(if border { style.stroke_alpha() } else { 1.0 }, style.fill_alpha()),
    );
    if !frame.matrix.is_identity() {
        b.transform(&frame.matrix);
    }

    let r = frame.rect;
    artifact.resources.insert(IMAGE_NAME.to_string(), ResourceKey::Image(image.to_string()));
    b.save_state()
        .transform(&Matrix::new(r.width, 0.0, 0.0, r.height, r.x, r.y))
        .op(ContentStreamOp::PaintXObject(IMAGE_NAME.to_string()))
        .restore_state();

    if border {
        let inner = r.inset(style.stroke_width() / 2.0);
        b.stroke_color(style.stroke_color())
            .set_line_width(style.stroke_width());
        if let Some(dash) = style.dash() {
            b.op(ContentStreamOp::SetDashPattern(dash.array.clone(), dash.phase));
        }
        b.rect(inner.x, inner.y, inner.width, inner.height)
            .op(ContentStreamOp::Stroke);
    }
    b.restore_state();

    artifact.operations = b.into_operations();
    Ok(artifact)
}

fn text_artifact(rect: Rect, frame: &CallerFrame, style: &Style, ctx: &RenderContext<'_>) -> Result<AnnotationArtifact> {
    let spacing = style.line_spacing().unwrap_or(ctx.config.line_spacing);
    let layout = TextLayout::new(style.content(), style, frame.rect, ctx.metrics, spacing)?;

    let mut artifact = AnnotationArtifact::empty(rect);
    if layout.lines().all(|line| line.text.is_empty()) {
        return Ok(artifact);
    }

    let mut b = ContentStreamBuilder::new();
    b.save_state();
    push_alpha(&mut b, &mut artifact.resources, AlphaState::new(1.0, style.text_alpha()));
    if !frame.matrix.is_identity() {
        b.transform(&frame.matrix);
    }
    artifact
        .resources
        .insert(FONT_NAME.to_string(), ResourceKey::Font(style.font().to_string()));
    b.fill_color(style.text_color())
        .op(ContentStreamOp::BeginText)
        .op(ContentStreamOp::SetFont(FONT_NAME.to_string(), style.font_size()));
    for line in layout.lines().filter(|line| !line.text.is_empty()) {
        b.op(ContentStreamOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, line.x, line.y))
            .op(ContentStreamOp::ShowText(encode_win_ansi(line.text)));
    }
    b.op(ContentStreamOp::EndText).restore_state();

    artifact.operations = b.into_operations();
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use crate::fonts::StandardFontMetrics;
    use crate::geometry::{normalize, Location, PageGeometry};
    use crate::style::{Color, StyleOverrides};

    fn page(rotation: i32) -> PageGeometry {
        PageGeometry::new(200.0, 300.0, rotation)
    }

    fn style(overrides: StyleOverrides) -> Style {
        Style::from_overrides(overrides).unwrap()
    }

    fn images() -> MemoryDocument {
        let mut doc = MemoryDocument::new();
        doc.add_image("logo", 2, 2, vec![0u8; 12]);
        doc
    }

    fn render(kind: AnnotationKind, location: Location, style: &Style, rotation: i32) -> Result<AnnotationArtifact> {
        let geometry = normalize(&location, &page(rotation))?;
        let annotation = Annotation::from_geometry(kind, &geometry, style)?;
        let config = AnnotatorConfig::default();
        let images = images();
        let ctx = RenderContext::new(&StandardFontMetrics, &images, &config);
        generate(&annotation, style, &ctx)
    }

    fn rect_loc() -> Location {
        Location::rect(0, 10.0, 20.0, 50.0, 60.0)
    }

    fn paint_ops(artifact: &AnnotationArtifact) -> Vec<&ContentStreamOp> {
        artifact.operations.iter().filter(|op| op.is_paint()).collect()
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("square".parse::<AnnotationKind>().unwrap(), AnnotationKind::Square);
        assert_eq!("polyline".parse::<AnnotationKind>().unwrap(), AnnotationKind::Polyline);
        for bad in ["Square", "squares", "", "highlight"] {
            assert!(matches!(bad.parse::<AnnotationKind>(), Err(Error::UnsupportedKind(_))), "{}", bad);
        }
        for kind in AnnotationKind::ALL {
            assert_eq!(kind.as_str().parse::<AnnotationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_square_stroke_only() {
        let artifact = render(AnnotationKind::Square, rect_loc(), &Style::default(), 0).unwrap();
        assert_eq!(artifact.bbox, Rect::new(10.0, 20.0, 40.0, 40.0));
        assert_eq!(artifact.operations, vec![
            ContentStreamOp::SaveState,
            ContentStreamOp::SetStrokeColorRGB(0.0, 0.0, 0.0),
            ContentStreamOp::SetLineWidth(1.0),
            ContentStreamOp::Rectangle(10.5, 20.5, 39.0, 39.0),
            ContentStreamOp::Stroke,
            ContentStreamOp::RestoreState,
        ]);
        assert!(artifact.resources.is_empty());
    }

    #[test]
    fn test_square_fill_and_stroke() {
        let s = style(StyleOverrides::new().with_fill(Color::rgb(0.0, 1.0, 0.0)).with_stroke_width(3.0));
        let artifact = render(AnnotationKind::Square, rect_loc(), &s, 0).unwrap();
        assert_eq!(paint_ops(&artifact), vec![&ContentStreamOp::FillStroke]);
        assert!(artifact.operations.contains(&ContentStreamOp::SetFillColorRGB(0.0, 1.0, 0.0)));
        assert!(artifact.operations.contains(&ContentStreamOp::Rectangle(11.5, 21.5, 37.0, 37.0)));
    }

    #[test]
    fn test_fill_only_uses_fill_operator() {
        let s = style(StyleOverrides::new().with_fill(Color::rgb(0.0, 0.0, 1.0)).with_stroke_width(0.0));
        let artifact = render(AnnotationKind::Circle, rect_loc(), &s, 0).unwrap();
        assert_eq!(paint_ops(&artifact), vec![&ContentStreamOp::Fill]);
        assert!(!artifact.operations.iter().any(|op| matches!(op, ContentStreamOp::SetLineWidth(_))));
    }

    #[test]
    fn test_invisible_square_has_bbox_but_no_ops() {
        let s = style(StyleOverrides::new().with_stroke_width(0.0));
        let artifact = render(AnnotationKind::Square, rect_loc(), &s, 0).unwrap();
        assert!(artifact.is_empty());
        assert_eq!(artifact.bbox.to_array(), [10.0, 20.0, 50.0, 60.0]);
    }

    #[test]
    fn test_circle_bbox_and_arcs() {
        let artifact = render(AnnotationKind::Circle, rect_loc(), &Style::default(), 0).unwrap();
        assert_eq!(artifact.bbox.to_array(), [10.0, 20.0, 50.0, 60.0]);
        let curves = artifact
            .operations
            .iter()
            .filter(|op| matches!(op, ContentStreamOp::CurveTo(..)))
            .count();
        assert_eq!(curves, 4);
        // radius 19.5 after half-stroke inset
        assert!(artifact.operations.contains(&ContentStreamOp::MoveTo(49.5, 40.0)));
    }

    #[test]
    fn test_polygon_closes_path() {
        let loc = Location::points(0, [(110.0, 20.0), (150.0, 20.0), (130.0, 60.0)]);
        let artifact = render(AnnotationKind::Polygon, loc, &Style::default(), 0).unwrap();
        assert_eq!(artifact.bbox.to_array(), [110.0, 20.0, 150.0, 60.0]);
        let ops = &artifact.operations;
        let close = ops.iter().position(|op| *op == ContentStreamOp::ClosePath).unwrap();
        assert_eq!(ops[close + 1], ContentStreamOp::Stroke);
    }

    #[test]
    fn test_polygon_needs_three_points() {
        let loc = Location::points(0, [(0.0, 0.0), (10.0, 10.0)]);
        let err = render(AnnotationKind::Polygon, loc, &Style::default(), 0).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_polyline_ignores_fill() {
        let s = style(StyleOverrides::new().with_fill(Color::rgb(0.0, 1.0, 0.0)));
        let loc = Location::points(0, [(160.0, 20.0), (200.0, 20.0), (180.0, 60.0)]);
        let artifact = render(AnnotationKind::Polyline, loc, &s, 0).unwrap();
        assert_eq!(paint_ops(&artifact), vec![&ContentStreamOp::Stroke]);
        assert!(!artifact.operations.contains(&ContentStreamOp::ClosePath));
        assert!(!artifact.operations.iter().any(|op| matches!(op, ContentStreamOp::SetFillColorRGB(..))));
    }

    #[test]
    fn test_line_needs_exactly_two_points() {
        let loc = Location::points(0, [(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)]);
        let err = render(AnnotationKind::Line, loc, &Style::default(), 0).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));

        let ok = render(AnnotationKind::Line, Location::points(0, [(210.0, 20.0), (250.0, 60.0)]), &Style::default(), 0);
        assert_eq!(ok.unwrap().bbox.to_array(), [210.0, 20.0, 250.0, 60.0]);
    }

    #[test]
    fn test_ink_defaults_to_round_caps() {
        let loc = Location::points(0, [(260.0, 20.0), (300.0, 60.0)]);
        let artifact = render(AnnotationKind::Ink, loc, &Style::default(), 0).unwrap();
        assert!(artifact.operations.contains(&ContentStreamOp::SetLineCap(LineCap::Round)));
        assert!(artifact.operations.contains(&ContentStreamOp::SetLineJoin(LineJoin::Round)));
    }

    #[test]
    fn test_shape_mismatch() {
        let pts = Location::points(0, [(0.0, 0.0), (10.0, 10.0)]);
        let err = render(AnnotationKind::Circle, pts, &Style::default(), 0).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));

        let err = render(AnnotationKind::Ink, rect_loc(), &Style::default(), 0).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_transparency_registers_graphics_state() {
        let s = style(
            StyleOverrides::new()
                .with_fill(Color::rgba(0.0, 0.0, 1.0, 0.5))
                .with_stroke_color(Color::rgba(1.0, 0.0, 0.0, 0.25)),
        );
        let artifact = render(AnnotationKind::Square, rect_loc(), &s, 0).unwrap();
        assert_eq!(
            artifact.resources.get("GS1"),
            Some(&ResourceKey::GraphicsState(AlphaState::new(0.25, 0.5)))
        );
        assert_eq!(artifact.operations[1], ContentStreamOp::SetExtGState("GS1".to_string()));
    }

    #[test]
    fn test_opaque_style_has_no_graphics_state() {
        let artifact = render(AnnotationKind::Square, rect_loc(), &Style::default(), 0).unwrap();
        assert!(!artifact.operations.iter().any(|op| matches!(op, ContentStreamOp::SetExtGState(_))));
    }

    #[test]
    fn test_dash_pattern_emitted() {
        let s = style(StyleOverrides::new().with_dash(vec![3.0, 2.0], 1.0));
        let artifact = render(AnnotationKind::Square, rect_loc(), &s, 0).unwrap();
        assert!(artifact.operations.contains(&ContentStreamOp::SetDashPattern(vec![3.0, 2.0], 1.0)));
    }

    #[test]
    fn test_image_on_rotated_page() {
        let s = style(StyleOverrides::new().with_image("logo").with_stroke_width(0.0));
        let artifact = render(AnnotationKind::Image, rect_loc(), &s, 90).unwrap();
        assert_eq!(artifact.bbox.to_array(), [140.0, 10.0, 180.0, 50.0]);
        assert_eq!(artifact.resources.get("Im1"), Some(&ResourceKey::Image("logo".to_string())));
        assert!(artifact.operations.contains(&ContentStreamOp::Transform(0.0, 1.0, -1.0, 0.0, 200.0, 0.0)));
        assert!(artifact.operations.contains(&ContentStreamOp::Transform(40.0, 0.0, 0.0, 40.0, 10.0, 20.0)));
        assert!(artifact.operations.contains(&ContentStreamOp::PaintXObject("Im1".to_string())));
        assert!(!artifact.operations.contains(&ContentStreamOp::Stroke));
    }

    #[test]
    fn test_image_border_and_transparency() {
        let s = style(
            StyleOverrides::new()
                .with_image("logo")
                .with_stroke_width(2.0)
                .with_fill_transparency(0.5)
                .with_stroke_transparency(0.5),
        );
        let artifact = render(AnnotationKind::Image, rect_loc(), &s, 0).unwrap();
        assert!(artifact.operations.contains(&ContentStreamOp::Rectangle(11.0, 21.0, 38.0, 38.0)));
        assert_eq!(
            artifact.resources.get("GS1"),
            Some(&ResourceKey::GraphicsState(AlphaState::new(0.5, 0.5)))
        );
    }

    #[test]
    fn test_image_without_reference_is_invalid_style() {
        let err = render(AnnotationKind::Image, rect_loc(), &Style::default(), 0).unwrap_err();
        assert!(matches!(err, Error::InvalidStyle(_)));
    }

    #[test]
    fn test_image_without_dimensions_is_resource_error() {
        let s = style(StyleOverrides::new().with_image("missing"));
        let err = render(AnnotationKind::Image, rect_loc(), &s, 0).unwrap_err();
        assert!(matches!(err, Error::ResourceError(_)));
    }

    #[test]
    fn test_text_lines() {
        let s = style(
            StyleOverrides::new()
                .with_content("a b c")
                .with_wrap_text(true)
                .with_text_baseline(crate::style::TextBaseline::Top)
                .with_fill(Color::rgb(0.0, 0.0, 1.0)),
        );
        let artifact = render(AnnotationKind::Text, Location::rect(0, 0.0, 0.0, 20.0, 100.0), &s, 0).unwrap();
        let shown: Vec<_> = artifact
            .operations
            .iter()
            .filter_map(|op| match op {
                ContentStreamOp::ShowText(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
                _ => None,
            })
            .collect();
        assert_eq!(shown, vec!["a b", "c"]);
        assert!(artifact.operations.contains(&ContentStreamOp::SetFillColorRGB(0.0, 0.0, 1.0)));
        assert!(artifact.operations.contains(&ContentStreamOp::SetFont("F1".to_string(), 12.0)));
        assert!(artifact.operations.contains(&ContentStreamOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, 0.0, 88.0)));
        assert_eq!(artifact.resources.get("F1"), Some(&ResourceKey::Font("Helvetica".to_string())));
    }

    #[test]
    fn test_text_without_fill_uses_stroke_transparency() {
        let s = style(
            StyleOverrides::new()
                .with_content("Latin")
                .with_stroke_color(Color::rgb(1.0, 0.0, 0.0))
                .with_stroke_transparency(0.5),
        );
        let artifact = render(AnnotationKind::Text, rect_loc(), &s, 0).unwrap();
        assert_eq!(
            artifact.resources.get("GS1"),
            Some(&ResourceKey::GraphicsState(AlphaState::new(1.0, 0.5)))
        );
        assert!(artifact.operations.contains(&ContentStreamOp::SetExtGState("GS1".to_string())));
        assert!(artifact.operations.contains(&ContentStreamOp::SetFillColorRGB(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_text_with_fill_ignores_stroke_transparency() {
        let s = style(
            StyleOverrides::new()
                .with_content("Latin")
                .with_fill(Color::rgba(0.0, 0.0, 1.0, 0.25))
                .with_stroke_transparency(0.5),
        );
        let artifact = render(AnnotationKind::Text, rect_loc(), &s, 0).unwrap();
        assert_eq!(
            artifact.resources.get("GS1"),
            Some(&ResourceKey::GraphicsState(AlphaState::new(1.0, 0.25)))
        );
    }

    #[test]
    fn test_text_with_tab_renders() {
        let s = style(StyleOverrides::new().with_content("Name:\tValue"));
        let artifact = render(AnnotationKind::Text, Location::rect(0, 0.0, 0.0, 200.0, 50.0), &s, 0).unwrap();
        assert!(artifact.operations.contains(&ContentStreamOp::ShowText(b"Name: Value".to_vec())));
    }

    #[test]
    fn test_empty_text_draws_nothing() {
        let artifact = render(AnnotationKind::Text, rect_loc(), &Style::default(), 0).unwrap();
        assert!(artifact.is_empty());
        assert!(artifact.resources.is_empty());
        assert_eq!(artifact.bbox.to_array(), [10.0, 20.0, 50.0, 60.0]);
    }

    #[test]
    fn test_text_on_rotated_page_uses_page_matrix() {
        let s = style(StyleOverrides::new().with_content("Latin"));
        let artifact = render(AnnotationKind::Text, rect_loc(), &s, 270).unwrap();
        assert!(artifact.operations.contains(&ContentStreamOp::Transform(0.0, -1.0, 1.0, 0.0, 0.0, 300.0)));
        assert_eq!(artifact.bbox.to_array(), [20.0, 250.0, 60.0, 290.0]);
    }

    #[test]
    fn test_text_with_unknown_font() {
        let s = style(StyleOverrides::new().with_content("x").with_font("Wingdings"));
        let err = render(AnnotationKind::Text, rect_loc(), &s, 0).unwrap_err();
        assert!(matches!(err, Error::ResourceError(_)));
    }

    #[test]
    fn test_content_serializes() {
        let artifact = render(AnnotationKind::Square, rect_loc(), &Style::default(), 0).unwrap();
        let content = String::from_utf8(artifact.content().unwrap()).unwrap();
        assert_eq!(content, "q\n0 0 0 RG\n1 w\n10.5 20.5 39 39 re\nS\nQ\n");
    }
}
