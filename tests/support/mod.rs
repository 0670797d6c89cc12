//! Test support library
//! Provides various helper functions & utilities for tests.

#![allow(dead_code)]

use dynavis::{Box2, Real};
use nalgebra::Point2;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Counter-clockwise axis aligned rectangle with its lower corner at `(x, y)`.
pub fn rect(x: Real, y: Real, w: Real, h: Real) -> Vec<Point2<Real>> {
    vec![
        Point2::new(x, y),
        Point2::new(x + w, y),
        Point2::new(x + w, y + h),
        Point2::new(x, y + h),
    ]
}

pub fn square(x: Real, y: Real, size: Real) -> Vec<Point2<Real>> {
    rect(x, y, size, size)
}

/// Same loop, opposite winding.
pub fn clockwise(points: &[Point2<Real>]) -> Vec<Point2<Real>> {
    points.iter().rev().copied().collect()
}

pub fn triangle(a: [Real; 2], b: [Real; 2], c: [Real; 2]) -> Vec<Point2<Real>> {
    vec![
        Point2::new(a[0], a[1]),
        Point2::new(b[0], b[1]),
        Point2::new(c[0], c[1]),
    ]
}

/// An L shaped (concave) outline with its corner at `(x, y)`.
pub fn l_shape(x: Real, y: Real, arm: Real, thickness: Real) -> Vec<Point2<Real>> {
    vec![
        Point2::new(x, y),
        Point2::new(x + arm, y),
        Point2::new(x + arm, y + thickness),
        Point2::new(x + thickness, y + thickness),
        Point2::new(x + thickness, y + arm),
        Point2::new(x, y + arm),
    ]
}

pub fn bounds(w: Real, h: Real) -> Box2 {
    Box2::from_coords(0.0, 0.0, w, h)
}
