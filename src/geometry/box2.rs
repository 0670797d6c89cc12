use crate::float_types::Real;
use nalgebra::Point2;

/// Axis aligned screen-space box. Edges are inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Box2 {
    pub mins: Point2<Real>,
    pub maxs: Point2<Real>,
}

impl Default for Box2 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Box2 {
    #[inline]
    pub const fn new(mins: Point2<Real>, maxs: Point2<Real>) -> Self {
        Self { mins, maxs }
    }

    #[inline]
    pub fn from_coords(min_x: Real, min_y: Real, max_x: Real, max_y: Real) -> Self {
        Self::new(Point2::new(min_x, min_y), Point2::new(max_x, max_y))
    }

    /// An inverted box that any added point will replace.
    pub fn empty() -> Self {
        Self::new(
            Point2::new(Real::MAX, Real::MAX),
            Point2::new(Real::MIN, Real::MIN),
        )
    }

    pub fn from_points(points: &[Point2<Real>]) -> Self {
        let mut bbox = Self::empty();
        points.iter().for_each(|p| bbox.add_point(p));
        bbox
    }

    #[inline]
    pub fn add_point(&mut self, p: &Point2<Real>) {
        self.mins.x = self.mins.x.min(p.x);
        self.mins.y = self.mins.y.min(p.y);
        self.maxs.x = self.maxs.x.max(p.x);
        self.maxs.y = self.maxs.y.max(p.y);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mins.x > self.maxs.x || self.mins.y > self.maxs.y
    }

    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.maxs.x >= other.mins.x
            && self.mins.x <= other.maxs.x
            && self.maxs.y >= other.mins.y
            && self.mins.y <= other.maxs.y
    }

    #[inline]
    pub fn contains(&self, p: &Point2<Real>) -> bool {
        p.x >= self.mins.x && p.x <= self.maxs.x && p.y >= self.mins.y && p.y <= self.maxs.y
    }

    pub fn intersection(&self, other: &Self) -> Self {
        Self::from_coords(
            self.mins.x.max(other.mins.x),
            self.mins.y.max(other.mins.y),
            self.maxs.x.min(other.maxs.x),
            self.maxs.y.min(other.maxs.y),
        )
    }

    #[inline]
    pub fn width(&self) -> Real {
        self.maxs.x - self.mins.x
    }

    #[inline]
    pub fn height(&self) -> Real {
        self.maxs.y - self.mins.y
    }

    /// Corners in counter-clockwise order, starting at `mins`.
    pub fn corners(&self) -> [Point2<Real>; 4] {
        [
            self.mins,
            Point2::new(self.maxs.x, self.mins.y),
            self.maxs,
            Point2::new(self.mins.x, self.maxs.y),
        ]
    }
}
