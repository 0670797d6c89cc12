mod support;

use dynavis::errors::ValidationError;
use dynavis::geometry::Plane2;
use dynavis::polyedge::{Poly2DEdges, Poly2DEdgesPool};
use dynavis::Real;
use nalgebra::{Point2, Vector2};
use support::{approx_eq, clockwise, l_shape, square};

#[test]
fn plane_from_edge_puts_left_negative() {
    let plane = Plane2::from_points(&Point2::new(0.0, 0.0), &Point2::new(10.0, 0.0)).unwrap();
    assert!(plane.classify(&Point2::new(5.0, 3.0)) < 0.0);
    assert!(plane.classify(&Point2::new(5.0, -3.0)) > 0.0);
    assert!(approx_eq(plane.classify(&Point2::new(7.0, 0.0)), 0.0, 1e-6));
    assert!(approx_eq(plane.norm.norm(), 1.0, 1e-6));

    assert!(Plane2::from_points(&Point2::new(1.0, 1.0), &Point2::new(1.0, 1.0)).is_none());
}

#[test]
fn loops_are_made_counter_clockwise() {
    let ccw = Poly2DEdges::from_vertices(&square(0.0, 0.0, 2.0));
    let cw = Poly2DEdges::from_vertices(&clockwise(&square(0.0, 0.0, 2.0)));
    assert!(approx_eq(ccw.area(), 4.0, 1e-4));
    assert!(approx_eq(cw.area(), 4.0, 1e-4));
    assert!(cw.contains_point(&Point2::new(1.0, 1.0)));
    assert!(!cw.contains_point(&Point2::new(3.0, 1.0)));
}

#[test]
fn zero_length_edges_are_dropped() {
    let mut verts = square(0.0, 0.0, 2.0);
    verts.insert(2, verts[1]);
    verts.push(verts[0]);
    let poly = Poly2DEdges::from_vertices(&verts);
    assert_eq!(poly.len(), 4);
    assert_eq!(poly.vertices().len(), 4);
}

#[test]
fn try_from_vertices_validates() {
    let nan = vec![
        Point2::new(0.0, 0.0),
        Point2::new(Real::NAN, 0.0),
        Point2::new(0.0, 1.0),
    ];
    assert!(matches!(
        Poly2DEdges::try_from_vertices(&nan),
        Err(ValidationError::InvalidCoordinate(_))
    ));

    let segment = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
    assert_eq!(
        Poly2DEdges::try_from_vertices(&segment),
        Err(ValidationError::TooFewPoints(2))
    );

    assert!(Poly2DEdges::try_from_vertices(&square(0.0, 0.0, 1.0)).is_ok());
}

#[test]
fn convexity() {
    assert!(Poly2DEdges::from_vertices(&square(0.0, 0.0, 1.0)).is_convex());
    assert!(!Poly2DEdges::from_vertices(&l_shape(0.0, 0.0, 10.0, 2.0)).is_convex());
    assert!(!Poly2DEdges::new().is_convex());
}

#[test]
fn bounding_box_covers_all_vertices() {
    let bbox = Poly2DEdges::from_vertices(&l_shape(1.0, 2.0, 10.0, 2.0)).bounding_box();
    assert_eq!(bbox.mins, Point2::new(1.0, 2.0));
    assert_eq!(bbox.maxs, Point2::new(11.0, 12.0));
}

#[test]
fn intersect_splits_crossing_edges() {
    let poly = Poly2DEdges::from_vertices(&square(0.0, 0.0, 2.0));
    // the line x = 1, left side is x < 1
    let plane = Plane2::new(Vector2::new(1.0, 0.0), -1.0);
    let mut left = Poly2DEdges::new();
    let mut right = Poly2DEdges::new();
    poly.intersect(&plane, &mut left, &mut right);

    assert_eq!(left.len(), 3);
    assert_eq!(right.len(), 3);
    for edge in left.iter() {
        assert!(edge.v1.x <= 1.0 + 1e-4 && edge.v2.x <= 1.0 + 1e-4);
    }
    for edge in right.iter() {
        assert!(edge.v1.x >= 1.0 - 1e-4 && edge.v2.x >= 1.0 - 1e-4);
    }
}

#[test]
fn intersect_defers_leading_coplanar_edges() {
    let poly = Poly2DEdges::from_vertices(&square(0.0, 0.0, 2.0));
    // the line through the first edge, interior on its left
    let first = poly.edges()[0];
    let plane = first.plane().unwrap();
    let mut left = Poly2DEdges::new();
    let mut right = Poly2DEdges::new();
    poly.intersect(&plane, &mut left, &mut right);

    assert_eq!(left.len(), 4);
    assert!(right.is_empty());
    // the coplanar edge is appended once the side is known
    assert_eq!(left.edges()[3], first);
}

#[test]
fn intersect_clears_outputs() {
    let poly = Poly2DEdges::from_vertices(&square(0.0, 0.0, 2.0));
    let plane = Plane2::new(Vector2::new(1.0, 0.0), -10.0);
    let mut left = Poly2DEdges::from_vertices(&square(5.0, 5.0, 1.0));
    let mut right = Poly2DEdges::from_vertices(&square(5.0, 5.0, 1.0));
    poly.intersect(&plane, &mut left, &mut right);
    assert_eq!(left.len(), 4);
    assert!(right.is_empty());
}

#[test]
fn pool_recycles_buffers() {
    let mut pool = Poly2DEdgesPool::new();
    let mut poly = pool.alloc();
    poly.add_edge(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
    pool.free(poly);
    assert_eq!(pool.len(), 1);

    let reused = pool.alloc();
    assert!(reused.is_empty());
    assert!(pool.is_empty());
}
