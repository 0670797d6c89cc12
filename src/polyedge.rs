//! Polygons stored as their boundary edge loop.
//!
//! The solid BSP never needs a polygon's vertices, only the oriented edges,
//! because edges are what get partitioned by splitter lines and what supply
//! new splitters. A polygon built with [`Poly2DEdges::from_vertices`] is
//! normalised to counter-clockwise winding so its interior lies to the left
//! of every edge.

use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::geometry::clip::{clip_left, is_degenerate, signed_area};
use crate::geometry::plane::{at_left, at_left_or_plane, at_right_or_plane, on_plane};
use crate::geometry::{Box2, Plane2};
use nalgebra::Point2;

/// An oriented boundary segment `v1 -> v2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub v1: Point2<Real>,
    pub v2: Point2<Real>,
}

impl Edge {
    #[inline]
    pub const fn new(v1: Point2<Real>, v2: Point2<Real>) -> Self {
        Self { v1, v2 }
    }

    #[inline]
    pub fn midpoint(&self) -> Point2<Real> {
        nalgebra::center(&self.v1, &self.v2)
    }

    /// The edge's supporting line, `None` for a zero-length edge.
    #[inline]
    pub fn plane(&self) -> Option<Plane2> {
        Plane2::from_points(&self.v1, &self.v2)
    }
}

/// Side that receives edges lying on the splitter while a loop is divided.
///
/// Such an edge carries no information about which half owns it, so it
/// follows the most recent edge that did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredSide {
    Undecided,
    Left,
    Right,
}

/// Growable edge loop of a convex (or nearly convex) screen-space polygon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Poly2DEdges {
    edges: Vec<Edge>,
}

impl Poly2DEdges {
    pub const fn new() -> Self {
        Self { edges: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            edges: Vec::with_capacity(capacity),
        }
    }

    /// Close the vertex loop into edges, counter-clockwise, skipping
    /// zero-length edges. No validation; see [`Self::try_from_vertices`].
    pub fn from_vertices(vertices: &[Point2<Real>]) -> Self {
        let n = vertices.len();
        let mut poly = Self::with_capacity(n);
        if n < 2 {
            return poly;
        }

        let mut ring = vertices.to_vec();
        if signed_area(&ring) < 0.0 {
            ring.reverse();
        }

        for i in 0..n {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            if (b - a).norm_squared() > Real::EPSILON {
                poly.add_edge(a, b);
            }
        }
        poly
    }

    /// Like [`Self::from_vertices`] but rejects non-finite coordinates and
    /// loops that end up with fewer than three edges.
    pub fn try_from_vertices(vertices: &[Point2<Real>]) -> Result<Self, ValidationError> {
        if let Some(bad) = vertices
            .iter()
            .find(|v| !v.x.is_finite() || !v.y.is_finite())
        {
            return Err(ValidationError::InvalidCoordinate(*bad));
        }
        let poly = Self::from_vertices(vertices);
        if poly.len() < 3 {
            return Err(ValidationError::TooFewPoints(poly.len()));
        }
        Ok(poly)
    }

    pub fn make_empty(&mut self) {
        self.edges.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    /// Append an edge and return its index.
    pub fn add_edge(&mut self, v1: Point2<Real>, v2: Point2<Real>) -> usize {
        self.edges.push(Edge::new(v1, v2));
        self.edges.len() - 1
    }

    #[inline]
    pub fn push(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Start points of the edges; the vertex loop for a closed polygon.
    pub fn vertices(&self) -> Vec<Point2<Real>> {
        self.edges.iter().map(|e| e.v1).collect()
    }

    pub fn bounding_box(&self) -> Box2 {
        let mut bbox = Box2::empty();
        for e in &self.edges {
            bbox.add_point(&e.v1);
            bbox.add_point(&e.v2);
        }
        bbox
    }

    /// Enclosed area of a closed loop (positive when counter-clockwise).
    pub fn area(&self) -> Real {
        let twice: Real = self
            .edges
            .iter()
            .map(|e| e.v1.x * e.v2.y - e.v2.x * e.v1.y)
            .sum();
        twice * 0.5
    }

    /// Supporting lines of all edges, in order.
    pub fn planes(&self) -> Vec<Plane2> {
        self.edges.iter().filter_map(Edge::plane).collect()
    }

    /// True if `v` is inside or on the boundary of this (convex) polygon.
    pub fn contains_point(&self, v: &Point2<Real>) -> bool {
        self.edges
            .iter()
            .filter_map(Edge::plane)
            .all(|plane| at_left_or_plane(plane.classify(v)))
    }

    /// Every vertex lies left of (or on) every edge line.
    ///
    /// Quadratic, but occluder outlines are short and this also rejects
    /// star shaped loops that turn left at every corner.
    pub fn is_convex(&self) -> bool {
        if self.edges.len() < 3 {
            return false;
        }
        self.edges.iter().filter_map(Edge::plane).all(|plane| {
            self.edges
                .iter()
                .all(|e| at_left_or_plane(plane.classify(&e.v1)))
        })
    }

    /// Split the edge loop by `plane` into `left` and `right` (both cleared first).
    ///
    /// Edges crossing the line are cut at the intersection and contribute a
    /// piece to each side. Edges on the line go to the current
    /// [`PreferredSide`]; coplanar edges met before any side is known are
    /// appended at the end once it is.
    pub fn intersect(&self, plane: &Plane2, left: &mut Self, right: &mut Self) {
        left.make_empty();
        right.make_empty();

        let mut preferred = PreferredSide::Undecided;
        let mut skip = 0usize;

        for edge in &self.edges {
            let c1 = plane.classify(&edge.v1);
            let c2 = plane.classify(&edge.v2);

            if on_plane(c1) {
                if on_plane(c2) {
                    match preferred {
                        PreferredSide::Undecided => skip += 1,
                        PreferredSide::Left => left.push(*edge),
                        PreferredSide::Right => right.push(*edge),
                    }
                } else if at_left(c2) {
                    left.push(*edge);
                    preferred = PreferredSide::Left;
                } else {
                    right.push(*edge);
                    preferred = PreferredSide::Right;
                }
            } else if at_left(c1) {
                if at_left_or_plane(c2) {
                    left.push(*edge);
                    preferred = PreferredSide::Left;
                } else {
                    let isect = plane.intersect_segment(&edge.v1, &edge.v2);
                    left.add_edge(edge.v1, isect);
                    right.add_edge(isect, edge.v2);
                    preferred = PreferredSide::Right;
                }
            } else if at_right_or_plane(c2) {
                right.push(*edge);
                preferred = PreferredSide::Right;
            } else {
                let isect = plane.intersect_segment(&edge.v1, &edge.v2);
                right.add_edge(edge.v1, isect);
                left.add_edge(isect, edge.v2);
                preferred = PreferredSide::Left;
            }
        }

        for edge in self.edges.iter().take(skip) {
            if preferred == PreferredSide::Left {
                left.push(*edge);
            } else {
                right.push(*edge);
            }
        }
    }
}

impl<'a> IntoIterator for &'a Poly2DEdges {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// Every vertex of the convex `region` is inside the polygon bounded by `planes`.
pub fn covers_region(planes: &[Plane2], region: &[Point2<Real>]) -> bool {
    !region.is_empty()
        && planes
            .iter()
            .all(|plane| region.iter().all(|v| at_left_or_plane(plane.classify(v))))
}

/// The polygon bounded by `planes` and the convex `region` share a
/// non-degenerate area.
pub fn overlaps_region(planes: &[Plane2], region: &[Point2<Real>]) -> bool {
    let mut clipped = region.to_vec();
    for plane in planes {
        clipped = clip_left(&clipped, plane);
        if is_degenerate(&clipped) {
            return false;
        }
    }
    !is_degenerate(&clipped)
}

/// Recycles edge buffers used while descending the BSP.
#[derive(Debug, Default)]
pub struct Poly2DEdgesPool {
    freed: Vec<Poly2DEdges>,
}

impl Poly2DEdgesPool {
    pub const fn new() -> Self {
        Self { freed: Vec::new() }
    }

    /// An empty polygon, reusing a freed buffer when one is available.
    pub fn alloc(&mut self) -> Poly2DEdges {
        match self.freed.pop() {
            Some(mut poly) => {
                poly.make_empty();
                poly
            },
            None => Poly2DEdges::new(),
        }
    }

    pub fn free(&mut self, poly: Poly2DEdges) {
        self.freed.push(poly);
    }

    /// Number of buffers waiting for reuse.
    pub fn len(&self) -> usize {
        self.freed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freed.is_empty()
    }
}
