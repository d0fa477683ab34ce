//! The spine entity: a fixed-length oriented segment whose endpoints are
//! derived from its pose.

use std::f64::consts::PI;
use std::fmt;

use crate::geometry::{Line, Point, Segment};

/// A mutable oriented segment.
///
/// `p1 = center + (cos θ, sin θ) * length / 2` and
/// `p2 = center - (cos θ, sin θ) * length / 2` hold after every mutation;
/// the fields are private so the endpoints can only change together with
/// the pose.
#[derive(Clone, Debug, PartialEq)]
pub struct Spine {
    center: Point,
    theta: f64,
    length: f64,
    identifier: Option<String>,
    p1: Point,
    p2: Point,
}

impl Spine {
    pub fn new(center: Point, theta: f64, length: f64) -> Self {
        let theta = normalize_angle(theta);
        let (p1, p2) = endpoints(center, theta, length);
        Self {
            center,
            theta,
            length,
            identifier: None,
            p1,
            p2,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Partial pose update. Fields passed as `None` keep their value; both
    /// endpoints are re-derived from the resulting pose.
    pub fn update(&mut self, center: Option<Point>, theta: Option<f64>, length: Option<f64>) {
        if let Some(center) = center {
            self.center = center;
        }
        if let Some(theta) = theta {
            self.theta = normalize_angle(theta);
        }
        if let Some(length) = length {
            self.length = length;
        }
        let (p1, p2) = endpoints(self.center, self.theta, self.length);
        self.p1 = p1;
        self.p2 = p2;
    }

    /// Move to a new center and orientation, keeping the length.
    pub fn set_pose(&mut self, center: Point, theta: f64) {
        self.update(Some(center), Some(theta), None);
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Orientation in `[0, π)`.
    #[inline]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    #[inline]
    pub fn p1(&self) -> Point {
        self.p1
    }

    #[inline]
    pub fn p2(&self) -> Point {
        self.p2
    }

    pub fn pose(&self) -> (Point, f64, f64) {
        (self.center, self.theta, self.length)
    }

    #[inline]
    pub fn segment(&self) -> Segment {
        Segment::new(self.p1, self.p2)
    }

    #[inline]
    pub fn line(&self) -> Line {
        Line::new(self.p1, self.p2)
    }

    /// True when the two segments touch in any way.
    pub fn is_overlapped_with(&self, other: &Spine) -> bool {
        self.segment().overlaps(&other.segment())
    }

    pub fn distance_to(&self, point: Point) -> f64 {
        self.segment().distance_to(point)
    }
}

impl fmt::Display for Spine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identifier {
            Some(id) => write!(
                f,
                "spine {} at {} theta={:.3} length={:.3}",
                id, self.center, self.theta, self.length
            ),
            None => write!(
                f,
                "spine at {} theta={:.3} length={:.3}",
                self.center, self.theta, self.length
            ),
        }
    }
}

fn normalize_angle(theta: f64) -> f64 {
    let t = theta.rem_euclid(PI);
    // rem_euclid can round up to exactly π for tiny negative inputs.
    if t >= PI {
        0.0
    } else {
        t
    }
}

fn endpoints(center: Point, theta: f64, length: f64) -> (Point, Point) {
    let half = Point::from_angle(theta) * (length / 2.0);
    (center + half, center - half)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_follow_pose() {
        let mut spine = Spine::new(Point::new(1.0, 1.0), 0.0, 2.0);
        assert_eq!(spine.p1(), Point::new(2.0, 1.0));
        assert_eq!(spine.p2(), Point::new(0.0, 1.0));

        spine.update(Some(Point::new(5.0, 5.0)), None, None);
        assert_eq!(spine.theta(), 0.0);
        assert_eq!(spine.p1(), Point::new(6.0, 5.0));
        assert_eq!(spine.p2(), Point::new(4.0, 5.0));

        spine.update(None, None, Some(4.0));
        assert_eq!(spine.center(), Point::new(5.0, 5.0));
        assert_eq!(spine.p1(), Point::new(7.0, 5.0));
    }

    #[test]
    fn test_theta_is_kept_in_half_turn() {
        let mut spine = Spine::new(Point::ZERO, -0.25, 1.0);
        assert!((spine.theta() - (PI - 0.25)).abs() < 1e-12);
        spine.update(None, Some(PI + 0.5), None);
        assert!((spine.theta() - 0.5).abs() < 1e-12);
        assert!(spine.theta() >= 0.0 && spine.theta() < PI);
    }

    #[test]
    fn test_distance_to_point() {
        let spine = Spine::new(Point::new(2.0, 2.0), 0.0, 2.0);
        // Beside the segment: perpendicular distance.
        assert!((spine.distance_to(Point::new(2.5, 4.0)) - 2.0).abs() < 1e-12);
        // Past the p1 end: distance to the endpoint.
        assert!((spine.distance_to(Point::new(6.0, 6.0)) - 5.0).abs() < 1e-12);
        assert!(spine.distance_to(Point::new(1.5, 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_identical_pose_spines_are_distinct_values() {
        let a = Spine::new(Point::ZERO, 0.3, 1.0).with_identifier("a");
        let b = Spine::new(Point::ZERO, 0.3, 1.0).with_identifier("b");
        assert_ne!(a, b);
        assert!(a.is_overlapped_with(&b));
    }
}
