//! Geometric primitives in PDF user space (origin bottom-left, y up).
//!
//! [`transform`] maps caller coordinates onto the page's intrinsic,
//! unrotated coordinate system.

pub mod transform;

pub use transform::{
    normalize, Location, Matrix, NormalizedGeometry, PageGeometry, PageTransform, Rotation, Shape,
};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_annotate::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
///
/// `(x, y)` is the lower-left corner; width and height are never negative
/// for rectangles built with [`Rect::from_corners`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of lower-left corner
    pub x: f64,
    /// Y coordinate of lower-left corner
    pub y: f64,
    /// Width of rectangle
    pub width: f64,
    /// Height of rectangle
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a normalized rectangle from two opposite corners, in any order.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_annotate::geometry::Rect;
    ///
    /// let rect = Rect::from_corners(50.0, 60.0, 10.0, 20.0);
    /// assert_eq!(rect.x, 10.0);
    /// assert_eq!(rect.y, 20.0);
    /// assert_eq!(rect.width, 40.0);
    /// assert_eq!(rect.height, 40.0);
    /// ```
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let (x0, x1) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (y0, y1) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Smallest rectangle containing every point. `None` for an empty slice.
    pub fn bounding(points: &[Point]) -> Option<Rect> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Rect::from_corners(min_x, min_y, max_x, max_y))
    }

    /// Left edge x-coordinate.
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Right edge x-coordinate.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate.
    pub fn bottom(&self) -> f64 {
        self.y
    }

    /// Top edge y-coordinate.
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// The four corners, counter-clockwise from the lower-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left(), self.bottom()),
            Point::new(self.right(), self.bottom()),
            Point::new(self.right(), self.top()),
            Point::new(self.left(), self.top()),
        ]
    }

    /// Shrink every edge by `amount`, never below zero size.
    pub fn inset(&self, amount: f64) -> Rect {
        let width = (self.width - 2.0 * amount).max(0.0);
        let height = (self.height - 2.0 * amount).max(0.0);
        Rect::new(self.center().x - width / 2.0, self.center().y - height / 2.0, width, height)
    }

    /// True when width or height is zero.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// `[x1 y1 x2 y2]` as used by `/Rect` and `/BBox`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.left(), self.bottom(), self.right(), self.top()]
    }
}
