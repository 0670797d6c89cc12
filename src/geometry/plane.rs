//! Oriented 2D lines and the epsilon band used to classify points against them.

use crate::float_types::{Real, tolerance};
use nalgebra::{Point2, Vector2};

// Point classification constants, combinable with `|`
pub const ON_PLANE: i8 = 0;
pub const LEFT: i8 = 1;
pub const RIGHT: i8 = 2;
pub const SPANNING: i8 = 3;

/// Signed distance is inside the tolerance band around the line.
#[inline]
pub fn on_plane(c: Real) -> bool {
    let eps = tolerance();
    c > -eps && c < eps
}

#[inline]
pub fn at_left(c: Real) -> bool {
    c <= -tolerance()
}

#[inline]
pub fn at_left_or_plane(c: Real) -> bool {
    c < tolerance()
}

#[inline]
pub fn at_right(c: Real) -> bool {
    c >= tolerance()
}

#[inline]
pub fn at_right_or_plane(c: Real) -> bool {
    c > -tolerance()
}

/// A 2D "plane" (a line) `norm · p + cc = 0` with a unit normal.
///
/// Points to the left of the edge the plane was built from classify
/// negative, points to the right positive. With counter-clockwise polygons
/// that puts the interior on the left of every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane2 {
    /// Unit normal, pointing to the right of the generating edge
    pub norm: Vector2<Real>,
    /// Offset, so that `classify(p) == 0` on the line
    pub cc: Real,
}

impl Default for Plane2 {
    fn default() -> Self {
        Self {
            norm: Vector2::x(),
            cc: 0.0,
        }
    }
}

impl Plane2 {
    pub const fn new(norm: Vector2<Real>, cc: Real) -> Self {
        Self { norm, cc }
    }

    /// Line through `v1` and `v2`, oriented so points left of `v1 -> v2`
    /// classify negative. `None` when the points coincide.
    pub fn from_points(v1: &Point2<Real>, v2: &Point2<Real>) -> Option<Self> {
        let d = v2 - v1;
        let norm = Vector2::new(d.y, -d.x);
        let len = norm.norm();
        if len <= Real::EPSILON {
            return None;
        }
        let norm = norm / len;
        Some(Self {
            norm,
            cc: -norm.dot(&v1.coords),
        })
    }

    /// Signed distance of `p` to the line.
    #[inline]
    pub fn classify(&self, p: &Point2<Real>) -> Real {
        self.norm.dot(&p.coords) + self.cc
    }

    /// Classify a point as `LEFT`, `RIGHT` or `ON_PLANE`.
    #[inline]
    pub fn orient_point(&self, p: &Point2<Real>) -> i8 {
        let c = self.classify(p);
        if at_left(c) {
            LEFT
        } else if at_right(c) {
            RIGHT
        } else {
            ON_PLANE
        }
    }

    /// Point where segment `v1 -> v2` crosses the line.
    ///
    /// Only meaningful when the endpoints are on opposite sides; a segment
    /// parallel to the line yields `v1`.
    pub fn intersect_segment(&self, v1: &Point2<Real>, v2: &Point2<Real>) -> Point2<Real> {
        let c1 = self.classify(v1);
        let c2 = self.classify(v2);
        let denom = c1 - c2;
        if denom.abs() <= Real::EPSILON {
            return *v1;
        }
        let t = c1 / denom;
        v1 + (v2 - v1) * t
    }
}
