//! Caller-space to intrinsic-space mapping.
//!
//! Callers describe annotation positions on the page as it is *displayed*:
//! origin at the bottom-left of the visible page, y up, after the stored
//! `/Rotate` has been applied. Content streams, `/Rect` and `/BBox` live in
//! the page's intrinsic (unrotated) coordinate system. [`PageTransform`]
//! converts between the two.
//!
//! For a page whose intrinsic size is `W x H`:
//!
//! ```text
//! rotation   caller (u, v) -> intrinsic
//!    0       (u, v)
//!   90       (W - v, u)
//!  180       (W - u, H - v)
//!  270       (v, H - u)
//! ```

use super::{Point, Rect};
use crate::error::{Error, Result};
use serde::Deserialize;

/// A 2D affine transformation matrix `[a b c d e f]`.
///
/// Points are row vectors: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// Horizontal scaling component
    pub a: f64,
    /// Rotation/skew component
    pub b: f64,
    /// Rotation/skew component
    pub c: f64,
    /// Vertical scaling component
    pub d: f64,
    /// Horizontal translation
    pub e: f64,
    /// Vertical translation
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    /// Create a matrix from its six components.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create an identity matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_annotate::geometry::Matrix;
    ///
    /// let m = Matrix::identity();
    /// assert_eq!(m.to_array(), [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    /// ```
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Create a translation matrix.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Create a scaling matrix.
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Compose two matrices: the result applies `self` first, then `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_annotate::geometry::{Matrix, Point};
    ///
    /// let m = Matrix::scaling(2.0, 2.0).multiply(&Matrix::translation(10.0, 0.0));
    /// assert_eq!(m.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
    /// ```
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point.
    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// Transform a rectangle, returning the axis-aligned bounds of its
    /// four transformed corners.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let corners = rect.corners().map(|c| self.transform_point(c));
        // four corners, never empty
        Rect::bounding(&corners).unwrap_or(*rect)
    }

    /// Inverse matrix, or `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Matrix> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Matrix {
            a,
            b,
            c,
            d,
            e: -(self.e * a + self.f * c),
            f: -(self.e * b + self.f * d),
        })
    }

    /// True for the identity transform.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Components as `[a b c d e f]`.
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

/// Canonical page rotation, clockwise when displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    /// No rotation
    #[default]
    Deg0,
    /// Rotated 90 degrees clockwise
    Deg90,
    /// Upside down
    Deg180,
    /// Rotated 270 degrees clockwise
    Deg270,
}

impl Rotation {
    /// Reduce a raw `/Rotate` value to a canonical rotation.
    ///
    /// Any multiple of 90 is accepted, including negative values.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_annotate::geometry::Rotation;
    ///
    /// assert_eq!(Rotation::from_degrees(450).unwrap(), Rotation::Deg90);
    /// assert_eq!(Rotation::from_degrees(-90).unwrap(), Rotation::Deg270);
    /// assert!(Rotation::from_degrees(45).is_err());
    /// ```
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(Error::InvalidGeometry(format!(
                "page rotation {} is not a multiple of 90",
                degrees
            )));
        }
        Ok(match degrees.rem_euclid(360) {
            0 => Rotation::Deg0,
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            _ => Rotation::Deg270,
        })
    }

    /// Rotation in degrees (0, 90, 180 or 270).
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// True when the displayed page swaps width and height.
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl TryFrom<i32> for Rotation {
    type Error = Error;

    fn try_from(degrees: i32) -> Result<Self> {
        Rotation::from_degrees(degrees)
    }
}

/// Intrinsic page dimensions and the raw `/Rotate` value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Intrinsic page width
    pub width: f64,
    /// Intrinsic page height
    pub height: f64,
    /// Raw `/Rotate` value
    pub rotation: i32,
}

impl PageGeometry {
    /// Create page geometry.
    pub fn new(width: f64, height: f64, rotation: i32) -> Self {
        Self {
            width,
            height,
            rotation,
        }
    }

    /// Width and height of the page as displayed.
    pub fn display_size(&self) -> Result<(f64, f64)> {
        let rotation = Rotation::from_degrees(self.rotation)?;
        Ok(if rotation.is_quarter_turn() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        })
    }
}

/// Caller-space description of where an annotation goes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Location {
    /// Rectangle given by two opposite corners
    Rect {
        /// Zero-based page index
        page: usize,
        /// First corner x
        x1: f64,
        /// First corner y
        y1: f64,
        /// Second corner x
        x2: f64,
        /// Second corner y
        y2: f64,
    },
    /// Ordered list of points
    Points {
        /// Zero-based page index
        page: usize,
        /// Points in order
        points: Vec<Point>,
    },
}

impl Location {
    /// Rectangle location.
    pub fn rect(page: usize, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Location::Rect {
            page,
            x1,
            y1,
            x2,
            y2,
        }
    }

    /// Point-list location.
    pub fn points<P: Into<Point>>(page: usize, points: impl IntoIterator<Item = P>) -> Self {
        Location::Points {
            page,
            points: points.into_iter().map(Into::into).collect(),
        }
    }

    /// Zero-based page index.
    pub fn page(&self) -> usize {
        match self {
            Location::Rect { page, .. } | Location::Points { page, .. } => *page,
        }
    }

    /// Same location normalized: rectangle corners ordered low to high.
    pub fn normalized(&self) -> Location {
        match self {
            Location::Rect {
                page,
                x1,
                y1,
                x2,
                y2,
            } => {
                let r = Rect::from_corners(*x1, *y1, *x2, *y2);
                Location::rect(*page, r.left(), r.bottom(), r.right(), r.top())
            },
            Location::Points { .. } => self.clone(),
        }
    }

    fn to_shape(&self) -> Result<Shape> {
        match self {
            Location::Rect { x1, y1, x2, y2, .. } => {
                if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
                    return Err(Error::InvalidGeometry(
                        "rectangle coordinates must be finite".to_string(),
                    ));
                }
                Ok(Shape::Rect(Rect::from_corners(*x1, *y1, *x2, *y2)))
            },
            Location::Points { points, .. } => {
                if points.len() < 2 {
                    return Err(Error::InvalidGeometry(format!(
                        "point list needs at least 2 points, got {}",
                        points.len()
                    )));
                }
                if !points.iter().all(Point::is_finite) {
                    return Err(Error::InvalidGeometry("point coordinates must be finite".to_string()));
                }
                Ok(Shape::Points(points.clone()))
            },
        }
    }
}

/// A rectangle or point list in some coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Normalized rectangle
    Rect(Rect),
    /// Ordered points
    Points(Vec<Point>),
}

impl Shape {
    /// Axis-aligned bounds of the shape.
    pub fn bbox(&self) -> Rect {
        match self {
            Shape::Rect(r) => *r,
            Shape::Points(points) => Rect::bounding(points).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        }
    }

    fn transform(&self, matrix: &Matrix) -> Shape {
        match self {
            Shape::Rect(r) => Shape::Rect(matrix.transform_rect(r)),
            Shape::Points(points) => {
                Shape::Points(points.iter().map(|p| matrix.transform_point(*p)).collect())
            },
        }
    }
}

/// A location mapped into intrinsic page space.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGeometry {
    /// Zero-based page index
    pub page: usize,
    /// Shape in intrinsic page space
    pub shape: Shape,
    /// The same shape in caller space
    pub visual: Shape,
    /// Caller-to-intrinsic matrix
    pub matrix: Matrix,
}

impl NormalizedGeometry {
    /// Intrinsic-space bounding box.
    pub fn bbox(&self) -> Rect {
        self.shape.bbox()
    }
}

/// The caller-to-intrinsic mapping for one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    rotation: Rotation,
    matrix: Matrix,
    inverse: Matrix,
}

impl PageTransform {
    /// Mapping for a page, with caller space equal to the displayed page.
    pub fn new(page: &PageGeometry) -> Result<Self> {
        Self::build(page, None)
    }

    /// Mapping for a page whose caller space was declared as
    /// `width x height` units (for example the pixel size of a rendered
    /// page image). Caller coordinates are scaled to the displayed page
    /// before rotation.
    pub fn with_caller_dimensions(page: &PageGeometry, width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "caller page dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Self::build(page, Some((width, height)))
    }

    fn build(page: &PageGeometry, caller_size: Option<(f64, f64)>) -> Result<Self> {
        if !(page.width.is_finite() && page.height.is_finite() && page.width > 0.0 && page.height > 0.0)
        {
            return Err(Error::InvalidGeometry(format!(
                "page dimensions must be positive, got {}x{}",
                page.width, page.height
            )));
        }
        let rotation = Rotation::from_degrees(page.rotation)?;
        let (w, h) = (page.width, page.height);
        let rotate = match rotation {
            Rotation::Deg0 => Matrix::identity(),
            Rotation::Deg90 => Matrix::new(0.0, 1.0, -1.0, 0.0, w, 0.0),
            Rotation::Deg180 => Matrix::new(-1.0, 0.0, 0.0, -1.0, w, h),
            Rotation::Deg270 => Matrix::new(0.0, -1.0, 1.0, 0.0, 0.0, h),
        };
        let matrix = match caller_size {
            Some((cw, ch)) => {
                let (dw, dh) = page.display_size()?;
                Matrix::scaling(dw / cw, dh / ch).multiply(&rotate)
            },
            None => rotate,
        };
        let inverse = matrix.inverse().ok_or_else(|| {
            Error::InvalidGeometry("page transform is not invertible".to_string())
        })?;
        Ok(Self {
            rotation,
            matrix,
            inverse,
        })
    }

    /// Canonical rotation of the page.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Caller-to-intrinsic matrix.
    pub fn matrix(&self) -> Matrix {
        self.matrix
    }

    /// Map a caller-space location into intrinsic space.
    pub fn normalize(&self, location: &Location) -> Result<NormalizedGeometry> {
        let visual = location.to_shape()?;
        Ok(NormalizedGeometry {
            page: location.page(),
            shape: visual.transform(&self.matrix),
            visual,
            matrix: self.matrix,
        })
    }

    /// Map normalized geometry back into caller space.
    pub fn display(&self, geometry: &NormalizedGeometry) -> Location {
        match geometry.shape.transform(&self.inverse) {
            Shape::Rect(r) => Location::rect(geometry.page, r.left(), r.bottom(), r.right(), r.top()),
            Shape::Points(points) => Location::Points {
                page: geometry.page,
                points,
            },
        }
    }

    /// Map a single intrinsic point into caller space.
    pub fn display_point(&self, p: Point) -> Point {
        self.inverse.transform_point(p)
    }
}

/// Map a caller-space location onto an unscaled page.
///
/// # Examples
///
/// ```
/// use pdf_annotate::geometry::{normalize, Location, PageGeometry};
///
/// let page = PageGeometry::new(200.0, 300.0, 90);
/// let geometry = normalize(&Location::rect(0, 10.0, 20.0, 50.0, 60.0), &page).unwrap();
/// assert_eq!(geometry.bbox().to_array(), [140.0, 10.0, 180.0, 50.0]);
/// ```
pub fn normalize(location: &Location, page: &PageGeometry) -> Result<NormalizedGeometry> {
    PageTransform::new(page)?.normalize(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rotation: i32) -> PageGeometry {
        PageGeometry::new(200.0, 300.0, rotation)
    }

    #[test]
    fn test_unrotated_rect_unchanged() {
        let g = normalize(&Location::rect(0, 10.0, 20.0, 50.0, 60.0), &page(0)).unwrap();
        assert_eq!(g.bbox(), Rect::new(10.0, 20.0, 40.0, 40.0));
        assert!(g.matrix.is_identity());
    }

    #[test]
    fn test_rect_on_quarter_turn_page() {
        let g = normalize(&Location::rect(0, 10.0, 20.0, 50.0, 60.0), &page(90)).unwrap();
        assert_eq!(g.bbox().to_array(), [140.0, 10.0, 180.0, 50.0]);
    }

    #[test]
    fn test_rect_upside_down() {
        let g = normalize(&Location::rect(0, 10.0, 20.0, 50.0, 60.0), &page(180)).unwrap();
        assert_eq!(g.bbox().to_array(), [150.0, 240.0, 190.0, 280.0]);
    }

    #[test]
    fn test_rect_three_quarter_turn() {
        let g = normalize(&Location::rect(0, 10.0, 20.0, 50.0, 60.0), &page(270)).unwrap();
        // (u, v) -> (v, H - u)
        assert_eq!(g.bbox().to_array(), [20.0, 250.0, 60.0, 290.0]);
    }

    #[test]
    fn test_points_preserve_order() {
        let loc = Location::points(0, [(10.0, 20.0), (30.0, 40.0), (50.0, 20.0)]);
        let g = normalize(&loc, &page(90)).unwrap();
        match g.shape {
            Shape::Points(points) => {
                assert_eq!(points, vec![
                    Point::new(180.0, 10.0),
                    Point::new(160.0, 30.0),
                    Point::new(180.0, 50.0),
                ]);
            },
            other => panic!("expected points, got {:?}", other),
        }
    }

    #[test]
    fn test_display_inverts_normalize() {
        let loc = Location::rect(0, 10.0, 20.0, 50.0, 60.0);
        for rotation in [0, 90, 180, 270] {
            let transform = PageTransform::new(&page(rotation)).unwrap();
            let g = transform.normalize(&loc).unwrap();
            assert_eq!(transform.display(&g), loc, "rotation {}", rotation);
        }
    }

    #[test]
    fn test_rotation_reduction() {
        assert_eq!(Rotation::try_from(360).unwrap(), Rotation::Deg0);
        assert_eq!(Rotation::try_from(-180).unwrap(), Rotation::Deg180);
        assert_eq!(Rotation::try_from(630).unwrap(), Rotation::Deg270);
    }

    #[test]
    fn test_invalid_rotation() {
        let err = normalize(&Location::rect(0, 0.0, 0.0, 1.0, 1.0), &page(45)).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_too_few_points() {
        let err = normalize(&Location::points(0, [(1.0, 1.0)]), &page(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_non_finite_coordinates() {
        let err = normalize(&Location::rect(0, f64::NAN, 0.0, 1.0, 1.0), &page(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_degenerate_rect_is_valid() {
        let g = normalize(&Location::rect(0, 5.0, 5.0, 5.0, 20.0), &page(0)).unwrap();
        assert!(g.bbox().is_degenerate());
    }

    #[test]
    fn test_caller_dimensions_scale_before_rotation() {
        // displayed page is 300x200; caller declared 600x400
        let transform = PageTransform::with_caller_dimensions(&page(90), 600.0, 400.0).unwrap();
        let g = transform.normalize(&Location::rect(0, 20.0, 40.0, 100.0, 120.0)).unwrap();
        assert_eq!(g.bbox().to_array(), [140.0, 10.0, 180.0, 50.0]);
    }

    #[test]
    fn test_caller_dimensions_must_be_positive() {
        assert!(PageTransform::with_caller_dimensions(&page(0), 0.0, 10.0).is_err());
    }

    #[test]
    fn test_display_size() {
        assert_eq!(page(90).display_size().unwrap(), (300.0, 200.0));
        assert_eq!(page(180).display_size().unwrap(), (200.0, 300.0));
    }

    #[test]
    fn test_matrix_inverse() {
        let m = Matrix::new(0.0, 1.0, -1.0, 0.0, 200.0, 0.0);
        let inv = m.inverse().unwrap();
        assert!(m.multiply(&inv).is_identity());
        assert!(Matrix::scaling(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_location_deserialize() {
        let rect: Location =
            serde_json::from_str(r#"{"page": 1, "x1": 10, "y1": 20, "x2": 50, "y2": 60}"#).unwrap();
        assert_eq!(rect, Location::rect(1, 10.0, 20.0, 50.0, 60.0));

        let pts: Location =
            serde_json::from_str(r#"{"page": 0, "points": [[1, 2], [3, 4]]}"#).unwrap();
        assert_eq!(pts, Location::points(0, [(1.0, 2.0), (3.0, 4.0)]));
    }

    #[test]
    fn test_location_normalized() {
        let loc = Location::rect(0, 50.0, 60.0, 10.0, 20.0);
        assert_eq!(loc.normalized(), Location::rect(0, 10.0, 20.0, 50.0, 60.0));
    }
}
