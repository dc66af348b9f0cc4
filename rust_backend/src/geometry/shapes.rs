//! Plate-frame shapes: points, circles, segments, lines and rectangles.
//!
//! All lengths are millimetres in the plate frame (origin at the plate
//! centre, +x to the right, +y up). Orientations are [`Radians`] measured
//! counter-clockwise from +x.
//!
//! Shapes are immutable value objects. Constructors that can receive
//! degenerate input return a [`GeometryError`] instead of building a shape
//! that would make later predicates meaningless.

use std::ops::{Add, Mul, Neg, Sub};

use qtty::Radians;
use serde::{Deserialize, Serialize};

/// Default comparison tolerance in millimetres.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Degenerate input handed to the geometry kernel.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("segment start and end coincide")]
    DegenerateSegment,

    #[error("rectangle has zero area ({width} x {height} mm)")]
    DegenerateRectangle { width: f64, height: f64 },

    #[error("circle radius must be positive, got {0} mm")]
    NonPositiveRadius(f64),

    #[error("segments are collinear and overlap along a stretch")]
    CoincidentSegments,
}

/// Absolute tolerance used by every comparison in the kernel.
///
/// Comparisons are inclusive: `a <= b` holds when `a <= b + eps`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance(pub f64);

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance(DEFAULT_TOLERANCE)
    }
}

impl Tolerance {
    #[inline]
    pub fn eps(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.0
    }

    #[inline]
    pub fn le(self, a: f64, b: f64) -> bool {
        a <= b + self.0
    }

    #[inline]
    pub fn lt(self, a: f64, b: f64) -> bool {
        a < b - self.0
    }

    #[inline]
    pub fn is_zero(self, a: f64) -> bool {
        a.abs() <= self.0
    }

    /// Inclusive range check with the bounds given in either order.
    #[inline]
    pub fn within(self, value: f64, a: f64, b: f64) -> bool {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.le(lo, value) && self.le(value, hi)
    }
}

// ============================================================================
// Point
// ============================================================================

/// A position on the plate, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle`.
    pub fn from_angle(angle: Radians) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin)
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3-D cross product.
    #[inline]
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self - other).norm()
    }

    /// Polar angle of the position vector.
    pub fn angle(self) -> Radians {
        Radians::new(self.y.atan2(self.x))
    }

    /// Rotate counter-clockwise about the origin.
    pub fn rotate(self, angle: Radians) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Perpendicular vector, rotated +90 degrees.
    #[inline]
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Coordinates as seen by the configuration robot (`x' = -y`, `y' = x`).
    #[inline]
    pub fn view(self) -> Self {
        self.perp()
    }

    pub fn approx_eq(self, other: Point, tol: Tolerance) -> bool {
        tol.eq(self.x, other.x) && tol.eq(self.y, other.y)
    }

    /// Lexicographic ordering on (x, y), used to canonicalise operand order.
    pub(crate) fn lex_cmp(self, other: Point) -> std::cmp::Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

// ============================================================================
// Circle
// ============================================================================

/// A circle with an orientation, used for circular magnet bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub orientation: Radians,
}

impl Circle {
    pub fn new(center: Point, radius: f64, orientation: Radians) -> Result<Self, GeometryError> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self {
            center,
            radius,
            orientation,
        })
    }

    /// Centre in the robot's viewing frame.
    pub fn view_center(&self) -> Point {
        self.center.view()
    }

    pub fn contains(&self, p: Point, tol: Tolerance) -> bool {
        tol.le(p.distance(self.center), self.radius)
    }
}

// ============================================================================
// Segment & Line
// ============================================================================

/// The infinite line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    #[inline]
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordered pair of plate positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[inline]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// `end - start`.
    #[inline]
    pub fn direction(&self) -> Point {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// Vertical when both endpoints share an x-coordinate.
    pub fn is_vertical(&self, tol: Tolerance) -> bool {
        tol.eq(self.start.x, self.end.x)
    }

    /// Slope/intercept form, `None` for vertical segments.
    pub fn line(&self, tol: Tolerance) -> Option<Line> {
        if self.is_vertical(tol) {
            return None;
        }
        let slope = (self.end.y - self.start.y) / (self.end.x - self.start.x);
        Some(Line {
            slope,
            intercept: self.start.y - slope * self.start.x,
        })
    }

    /// Same segment with endpoints in lexicographic order.
    pub(crate) fn canonical(&self) -> Segment {
        if self.start.lex_cmp(self.end).is_gt() {
            Segment::new(self.end, self.start)
        } else {
            *self
        }
    }
}

// ============================================================================
// Rectangle
// ============================================================================

/// An oriented rectangle. `width` runs along the orientation axis, `height`
/// across it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub orientation: Radians,
}

impl Rectangle {
    pub fn new(
        center: Point,
        width: f64,
        height: f64,
        orientation: Radians,
    ) -> Result<Self, GeometryError> {
        if width.is_nan() || height.is_nan() || width <= 0.0 || height <= 0.0 {
            return Err(GeometryError::DegenerateRectangle { width, height });
        }
        Ok(Self {
            center,
            width,
            height,
            orientation,
        })
    }

    /// Unit vector along the width.
    pub fn axis(&self) -> Point {
        Point::from_angle(self.orientation)
    }

    /// Corners in counter-clockwise cyclic order, starting from the corner at
    /// local `(-w/2, -h/2)`.
    pub fn corners(&self) -> [Point; 4] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
            .map(|(x, y)| self.center + Point::new(x, y).rotate(self.orientation))
    }

    /// Sides in the same cyclic order as [`Rectangle::corners`].
    pub fn sides(&self) -> [Segment; 4] {
        let c = self.corners();
        [
            Segment::new(c[0], c[1]),
            Segment::new(c[1], c[2]),
            Segment::new(c[2], c[3]),
            Segment::new(c[3], c[0]),
        ]
    }

    /// Express a plate position in the rectangle's own frame.
    pub fn to_local(&self, p: Point) -> Point {
        (p - self.center).rotate(Radians::new(-self.orientation.value()))
    }

    pub fn contains(&self, p: Point, tol: Tolerance) -> bool {
        let local = self.to_local(p);
        tol.le(local.x.abs(), self.width / 2.0) && tol.le(local.y.abs(), self.height / 2.0)
    }
}
