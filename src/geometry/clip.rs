//! Convex vertex-loop clipping against a [`Plane2`].

use crate::float_types::{Real, tolerance};
use crate::geometry::plane::{LEFT, Plane2, RIGHT, SPANNING};
use nalgebra::Point2;

/// Split a convex vertex loop by `plane` into its (left, right) parts.
///
/// Vertices within the tolerance band go to both sides, so a loop lying
/// entirely on one side leaves at most two vertices on the other.
pub fn split_convex(
    vertices: &[Point2<Real>],
    plane: &Plane2,
) -> (Vec<Point2<Real>>, Vec<Point2<Real>>) {
    let mut left = Vec::with_capacity(vertices.len() + 1);
    let mut right = Vec::with_capacity(vertices.len() + 1);

    let types: Vec<i8> = vertices.iter().map(|v| plane.orient_point(v)).collect();

    for i in 0..vertices.len() {
        let j = (i + 1) % vertices.len();
        let (type_i, type_j) = (types[i], types[j]);

        if type_i != RIGHT {
            left.push(vertices[i]);
        }
        if type_i != LEFT {
            right.push(vertices[i]);
        }
        if (type_i | type_j) == SPANNING {
            let isect = plane.intersect_segment(&vertices[i], &vertices[j]);
            left.push(isect);
            right.push(isect);
        }
    }

    (left, right)
}

/// Keep only the part of a convex loop left of `plane`.
pub fn clip_left(vertices: &[Point2<Real>], plane: &Plane2) -> Vec<Point2<Real>> {
    if vertices.iter().all(|v| plane.orient_point(v) != RIGHT) {
        return vertices.to_vec();
    }
    split_convex(vertices, plane).0
}

/// Signed area (shoelace), positive for counter-clockwise loops.
pub fn signed_area(vertices: &[Point2<Real>]) -> Real {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let twice: Real = (0..n)
        .map(|i| {
            let (a, b) = (&vertices[i], &vertices[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice * 0.5
}

/// A loop with fewer than three vertices or (near) zero area.
#[inline]
pub fn is_degenerate(vertices: &[Point2<Real>]) -> bool {
    vertices.len() < 3 || signed_area(vertices).abs() <= tolerance()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2<Real>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn split_square_in_half() {
        let plane = Plane2::from_points(&Point2::new(4.0, 0.0), &Point2::new(4.0, 10.0)).unwrap();
        let (left, right) = split_convex(&square(), &plane);
        assert!((signed_area(&left) - 40.0).abs() < 1e-3);
        assert!((signed_area(&right) - 60.0).abs() < 1e-3);
    }

    #[test]
    fn split_along_border_leaves_degenerate_side() {
        let plane = Plane2::from_points(&Point2::new(0.0, 0.0), &Point2::new(10.0, 0.0)).unwrap();
        let (left, right) = split_convex(&square(), &plane);
        assert!(!is_degenerate(&left));
        assert!(is_degenerate(&right));
    }
}
