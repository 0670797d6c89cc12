//! Solid 2D BSP over screen space.
//!
//! The polygons inserted in this tree are irrelevant once inserted. The only
//! thing that matters is whether a region is solid (completely covered) or
//! not. Each node implicitly owns a convex region of the screen: the root
//! owns `bounds`, and every splitter cuts its node's region in two.

use crate::bsp::node::NodeIndex;
use crate::bsp::pool::NodePool;
use crate::float_types::Real;
use crate::geometry::clip::{is_degenerate, split_convex};
use crate::geometry::plane::{at_left, at_right};
use crate::geometry::{Box2, Plane2};
use crate::polyedge::{Poly2DEdges, Poly2DEdgesPool, covers_region, overlaps_region};
use nalgebra::Point2;
use std::fmt::Write;

/// Result of [`SolidBsp::classify_polygon`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coverage {
    /// Some part of the polygon lies in a region that is not solid.
    pub visible: bool,
    /// Some part of the polygon lies in a solid region.
    pub solid: bool,
}

impl Coverage {
    #[inline]
    pub const fn is_occluded(&self) -> bool {
        !self.visible
    }

    #[inline]
    pub const fn is_fully_visible(&self) -> bool {
        self.visible && !self.solid
    }
}

/// A solid BSP tree. Nodes live in a [`NodePool`] that is passed to every
/// operation, so several trees can share one pool.
#[derive(Debug)]
pub struct SolidBsp {
    root: NodeIndex,
    bounds: Box2,
    poly_pool: Poly2DEdgesPool,
}

/// The line cuts the region into two parts that both have some extent.
fn cuts_region(plane: &Plane2, region: &[Point2<Real>]) -> bool {
    let mut left = false;
    let mut right = false;
    for v in region {
        let c = plane.classify(v);
        left |= at_left(c);
        right |= at_right(c);
        if left && right {
            return true;
        }
    }
    false
}

impl SolidBsp {
    /// Create an empty tree covering `bounds`.
    pub fn new(pool: &mut NodePool, bounds: Box2) -> Self {
        Self {
            root: pool.alloc(),
            bounds,
            poly_pool: Poly2DEdgesPool::new(),
        }
    }

    #[inline]
    pub const fn root(&self) -> NodeIndex {
        self.root
    }

    #[inline]
    pub const fn bounds(&self) -> Box2 {
        self.bounds
    }

    /// Make the tree empty. The old nodes go back to the pool as one subtree.
    pub fn make_empty(&mut self, pool: &mut NodePool) {
        pool.free(self.root);
        self.root = pool.alloc();
    }

    /// Is the tree full?
    ///
    /// Always false: the tree only accumulates solid fragments and never
    /// claims its whole universe is covered.
    pub const fn is_full(&self) -> bool {
        false
    }

    /// Insert a polygon given as a vertex loop (either winding).
    ///
    /// Returns true if the tree was modified, i.e. some part of the polygon
    /// was not solid before. Loops with fewer than three vertices are ignored.
    pub fn insert_polygon(&mut self, pool: &mut NodePool, verts: &[Point2<Real>]) -> bool {
        if verts.len() < 3 {
            return false;
        }
        let poly = Poly2DEdges::from_vertices(verts);
        self.insert_edges(pool, &poly)
    }

    /// Insert a counter-clockwise convex edge loop.
    pub fn insert_edges(&mut self, pool: &mut NodePool, poly: &Poly2DEdges) -> bool {
        if poly.len() < 3 {
            return false;
        }
        let planes = poly.planes();
        let region = self.bounds.corners();
        if is_degenerate(&region) {
            return false;
        }
        let root = self.root;
        self.insert_node(pool, root, poly, &planes, &region)
    }

    fn insert_node(
        &mut self,
        pool: &mut NodePool,
        index: NodeIndex,
        edges: &Poly2DEdges,
        planes: &[Plane2],
        region: &[Point2<Real>],
    ) -> bool {
        let node = pool.node(index);
        if node.solid {
            return false;
        }

        let fresh = node.is_leaf();
        if fresh {
            if covers_region(planes, region) {
                pool.node_mut(index).solid = true;
                return true;
            }

            // first edge whose line really divides this leaf
            let Some((splitter, center)) = edges.iter().find_map(|edge| {
                let plane = edge.plane()?;
                cuts_region(&plane, region).then(|| (plane, edge.midpoint()))
            }) else {
                return false;
            };

            let (left, right) = (pool.alloc(), pool.alloc());
            let node = pool.node_mut(index);
            node.splitter = splitter;
            node.split_center = center;
            node.left = Some(left);
            node.right = Some(right);
        }

        let node = pool.node(index);
        let splitter = node.splitter;
        let (Some(left), Some(right)) = (node.left, node.right) else {
            return false;
        };

        let mut left_edges = self.poly_pool.alloc();
        let mut right_edges = self.poly_pool.alloc();
        edges.intersect(&splitter, &mut left_edges, &mut right_edges);
        let (left_region, right_region) = split_convex(region, &splitter);

        let mut changed = self.insert_child(pool, left, &left_edges, planes, &left_region);
        changed |= self.insert_child(pool, right, &right_edges, planes, &right_region);

        self.poly_pool.free(left_edges);
        self.poly_pool.free(right_edges);

        if fresh && !changed {
            // the split bought nothing, undo it
            pool.free(left);
            pool.free(right);
            pool.node_mut(index).reset();
        } else if pool.node(left).is_solid() && pool.node(right).is_solid() {
            pool.free(left);
            pool.free(right);
            let node = pool.node_mut(index);
            node.reset();
            node.solid = true;
        }
        changed
    }

    fn insert_child(
        &mut self,
        pool: &mut NodePool,
        child: NodeIndex,
        edges: &Poly2DEdges,
        planes: &[Plane2],
        region: &[Point2<Real>],
    ) -> bool {
        if is_degenerate(region) {
            return false;
        }
        if edges.is_empty() {
            // no boundary on this side: covered entirely or not at all
            return covers_region(planes, region) && Self::fill(pool, child);
        }
        self.insert_node(pool, child, edges, planes, region)
    }

    /// Make a whole subtree one solid leaf. False if it already was solid.
    fn fill(pool: &mut NodePool, index: NodeIndex) -> bool {
        let node = pool.node_mut(index);
        if node.solid {
            return false;
        }
        let (left, right) = (node.left, node.right);
        node.reset();
        node.solid = true;
        for child in [left, right].into_iter().flatten() {
            pool.free(child);
        }
        true
    }

    /// Test a polygon for visibility: true if some part of it lies outside
    /// every solid region. Polygons outside `bounds` are not visible.
    pub fn test_polygon(&self, pool: &NodePool, verts: &[Point2<Real>]) -> bool {
        self.classify(pool, verts, true).visible
    }

    /// Like [`Self::test_polygon`] but also reports whether the polygon
    /// touches solid regions, telling fully from partially visible.
    pub fn classify_polygon(&self, pool: &NodePool, verts: &[Point2<Real>]) -> Coverage {
        self.classify(pool, verts, false)
    }

    fn classify(&self, pool: &NodePool, verts: &[Point2<Real>], visible_only: bool) -> Coverage {
        let mut coverage = Coverage::default();
        if verts.len() < 3 {
            return coverage;
        }
        let poly = Poly2DEdges::from_vertices(verts);
        if poly.len() < 3 {
            return coverage;
        }
        let planes = poly.planes();
        let region = self.bounds.corners();
        if !is_degenerate(&region) {
            Self::classify_node(pool, self.root, &poly, &planes, &region, &mut coverage, visible_only);
        }
        coverage
    }

    #[inline]
    const fn done(coverage: &Coverage, visible_only: bool) -> bool {
        coverage.visible && (visible_only || coverage.solid)
    }

    fn classify_node(
        pool: &NodePool,
        index: NodeIndex,
        edges: &Poly2DEdges,
        planes: &[Plane2],
        region: &[Point2<Real>],
        coverage: &mut Coverage,
        visible_only: bool,
    ) {
        let node = pool.node(index);
        let (Some(left), Some(right)) = (node.left, node.right) else {
            if overlaps_region(planes, region) {
                if node.solid {
                    coverage.solid = true;
                } else {
                    coverage.visible = true;
                }
            }
            return;
        };

        let mut left_edges = Poly2DEdges::with_capacity(edges.len());
        let mut right_edges = Poly2DEdges::with_capacity(edges.len());
        edges.intersect(&node.splitter, &mut left_edges, &mut right_edges);
        let (left_region, right_region) = split_convex(region, &node.splitter);

        for (child, child_edges, child_region) in [
            (left, &left_edges, &left_region),
            (right, &right_edges, &right_region),
        ] {
            if is_degenerate(child_region) {
                continue;
            }
            if child_edges.is_empty() {
                if covers_region(planes, child_region) {
                    Self::collect_leaves(pool, child, coverage, visible_only);
                }
            } else {
                Self::classify_node(
                    pool,
                    child,
                    child_edges,
                    planes,
                    child_region,
                    coverage,
                    visible_only,
                );
            }
            if Self::done(coverage, visible_only) {
                return;
            }
        }
    }

    /// Record the leaf kinds of a subtree the polygon covers completely.
    fn collect_leaves(pool: &NodePool, index: NodeIndex, coverage: &mut Coverage, visible_only: bool) {
        let node = pool.node(index);
        match (node.left, node.right) {
            (Some(left), Some(right)) => {
                Self::collect_leaves(pool, left, coverage, visible_only);
                if !Self::done(coverage, visible_only) {
                    Self::collect_leaves(pool, right, coverage, visible_only);
                }
            },
            _ if node.solid => coverage.solid = true,
            _ => coverage.visible = true,
        }
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self, pool: &NodePool) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            count += 1;
            let node = pool.node(index);
            stack.extend([node.left, node.right].into_iter().flatten());
        }
        count
    }

    /// Human readable listing of the tree, one node per line.
    pub fn dump(&self, pool: &NodePool) -> String {
        let mut out = String::new();
        self.dump_node(pool, self.root, 0, &mut out);
        out
    }

    fn dump_node(&self, pool: &NodePool, index: NodeIndex, depth: usize, out: &mut String) {
        let node = pool.node(index);
        let indent = "  ".repeat(depth);
        match (node.left, node.right) {
            (Some(left), Some(right)) => {
                let _ = writeln!(
                    out,
                    "{indent}{index} split n=({:.3},{:.3}) c={:.3} at ({:.2},{:.2})",
                    node.splitter.norm.x,
                    node.splitter.norm.y,
                    node.splitter.cc,
                    node.split_center.x,
                    node.split_center.y
                );
                self.dump_node(pool, left, depth + 1, out);
                self.dump_node(pool, right, depth + 1, out);
            },
            _ if node.solid => {
                let _ = writeln!(out, "{indent}{index} solid");
            },
            _ => {
                let _ = writeln!(out, "{indent}{index} empty");
            },
        }
    }
}
