//! Planar geometry kernel: points, infinite lines, bounded segments and the
//! orientation predicate that bounds line intersection to finite segments.
//!
//! Every comparison against zero goes through [`EPS`] so that floating-point
//! drift does not flip a classification.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Numeric tolerance shared by every zero test in the kernel.
pub const EPS: f64 = 1.0e-6;

/// A 2D vector. Ordering is lexicographic on `(x, y)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `angle` radians from the +x axis.
    #[inline]
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Signed area of the parallelogram spanned by `self` and `other`
    /// (z-component of the 3D cross product).
    #[inline]
    pub fn det(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Counter-clockwise quarter turn.
    #[inline]
    pub fn rotate90(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// Rotate about the origin by `angle` radians.
    #[inline]
    pub fn rotate(&self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Unit vector in the same direction, or `None` for a vector shorter than [`EPS`].
    #[inline]
    pub fn normalized(&self) -> Option<Point> {
        let len = self.norm();
        if len < EPS {
            None
        } else {
            Some(*self / len)
        }
    }

    /// Heading of the vector in degrees, CCW from +x.
    #[inline]
    pub fn degrees(&self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

impl Neg for Point {
    type Output = Point;

    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }
}

/// Component-wise product.
impl Mul<Point> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, other: Point) -> Point {
        Point::new(self.x * other.x, self.y * other.y)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    #[inline]
    fn div(self, scalar: f64) -> Point {
        Point::new(self.x / scalar, self.y / scalar)
    }
}

/// Component-wise quotient.
impl Div<Point> for Point {
    type Output = Point;

    #[inline]
    fn div(self, other: Point) -> Point {
        Point::new(self.x / other.x, self.y / other.y)
    }
}

/// How two lines (or segments) relate to each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    /// The supporting lines meet in exactly one point.
    Cross,
    /// Distinct parallel lines.
    Parallel,
    /// Both lie on the same line.
    Same,
    /// Bounded segments that do not touch. Never produced by [`Line::relation`].
    NotCross,
}

/// Result of intersecting two infinite lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intersection {
    At(Point),
    /// Parallel lines never meet.
    Parallel,
    /// Identical lines: every point of the line qualifies.
    Coincident,
}

impl Intersection {
    /// The single crossing point, if there is one.
    pub fn point(self) -> Option<Point> {
        match self {
            Intersection::At(p) => Some(p),
            Intersection::Parallel | Intersection::Coincident => None,
        }
    }
}

/// Outcome of the orientation predicate for three points `a`, `b`, `c`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    /// `a -> b -> c` turns left.
    CounterClockwise,
    /// `a -> b -> c` turns right.
    Clockwise,
    /// Collinear with `c` on the closed segment `a..b`.
    Between,
    /// Collinear in the order `c, a, b`.
    Behind,
    /// Collinear in the order `a, b, c`.
    Beyond,
}

impl Turn {
    /// Integer code used by the straddle test: +1, -1, 0, -2, +2.
    #[inline]
    pub fn value(self) -> i32 {
        match self {
            Turn::CounterClockwise => 1,
            Turn::Clockwise => -1,
            Turn::Between => 0,
            Turn::Behind => -2,
            Turn::Beyond => 2,
        }
    }
}

/// Orientation predicate.
///
/// The sign of `(b - a) x (c - a)` gives the turn direction. When the three
/// points are collinear a pair of dot products decides whether `c` lies
/// before `a`, after `b`, or between them.
pub fn orientation(a: Point, b: Point, c: Point) -> Turn {
    let ab = b - a;
    let area = ab.det(c - a);
    if area < -EPS {
        Turn::Clockwise
    } else if area < EPS {
        if ab.dot(c - a) < -EPS {
            Turn::Behind
        } else if (a - b).dot(c - b) < -EPS {
            Turn::Beyond
        } else {
            Turn::Between
        }
    } else {
        Turn::CounterClockwise
    }
}

/// An infinite line through two distinct points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
}

impl Line {
    #[inline]
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn direction(&self) -> Point {
        self.p2 - self.p1
    }

    pub fn relation(&self, other: &Line) -> Relation {
        let d = self.p1 - self.p2;
        if d.det(other.p1 - other.p2).abs() >= EPS {
            return Relation::Cross;
        }
        if d.det(other.p1 - self.p2).abs() >= EPS {
            Relation::Parallel
        } else {
            Relation::Same
        }
    }

    /// Closed-form intersection of the two lines.
    pub fn intersection(&self, other: &Line) -> Intersection {
        match self.relation(other) {
            Relation::Cross => {
                let other_dir = other.direction();
                let numer = (other.p1 - self.p1).det(other_dir);
                let denom = self.direction().det(other_dir);
                Intersection::At(self.p1 + self.direction() * (numer / denom))
            }
            Relation::Parallel => Intersection::Parallel,
            Relation::Same | Relation::NotCross => Intersection::Coincident,
        }
    }

    /// Perpendicular distance from `point` to the line.
    pub fn distance_to(&self, point: Point) -> f64 {
        ((point - self.p1).det(self.direction()) / self.direction().norm()).abs()
    }
}

/// A bounded segment between two endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    #[inline]
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// The supporting line.
    #[inline]
    pub fn line(&self) -> Line {
        Line::new(self.p1, self.p2)
    }

    /// Each segment's endpoints must straddle (or touch) the other's line
    /// before the supporting-line relation is consulted.
    pub fn relation(&self, other: &Segment) -> Relation {
        let straddles_self = orientation(self.p1, self.p2, other.p1).value()
            * orientation(self.p1, self.p2, other.p2).value()
            <= 0;
        let straddles_other = orientation(other.p1, other.p2, self.p1).value()
            * orientation(other.p1, other.p2, self.p2).value()
            <= 0;
        if straddles_self && straddles_other {
            self.line().relation(&other.line())
        } else {
            Relation::NotCross
        }
    }

    /// Segments that touch anywhere, including endpoint contact and
    /// collinear overlap.
    #[inline]
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.relation(other) != Relation::NotCross
    }

    /// Intersection of two touching segments, `None` when they are apart.
    pub fn intersection(&self, other: &Segment) -> Option<Intersection> {
        if self.overlaps(other) {
            Some(self.line().intersection(&other.line()))
        } else {
            None
        }
    }

    /// Distance from `point` to the nearest point of the segment.
    pub fn distance_to(&self, point: Point) -> f64 {
        if self.line().direction().dot(point - self.p1) < -EPS {
            (point - self.p1).norm()
        } else if (self.p1 - self.p2).dot(point - self.p2) < -EPS {
            (point - self.p2).norm()
        } else {
            self.line().distance_to(point)
        }
    }
}
