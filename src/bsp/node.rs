//! Solid BSP node data structure

use crate::float_types::Real;
use crate::geometry::Plane2;
use nalgebra::Point2;
use std::fmt;

/// Handle of a node inside a [`NodePool`](crate::bsp::NodePool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(u32);

impl NodeIndex {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node says about its screen region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Leaf, nothing covered yet
    Empty,
    /// Leaf, fully covered by occluders
    Solid,
    /// Two children divided by `splitter`
    Split,
}

/// A solid BSP node.
///
/// Children are owned through the pool and are recycled, never dropped
/// one by one.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidBspNode {
    /// Child left of (negative side of) `splitter`.
    pub(crate) left: Option<NodeIndex>,
    /// Child right of `splitter`.
    pub(crate) right: Option<NodeIndex>,
    /// The line dividing `left` and `right`.
    pub(crate) splitter: Plane2,
    /// Midpoint of the polygon edge the splitter was taken from.
    pub(crate) split_center: Point2<Real>,
    /// True if this node is solid.
    pub(crate) solid: bool,
}

impl Default for SolidBspNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SolidBspNode {
    /// Make an empty node.
    pub fn new() -> Self {
        Self {
            left: None,
            right: None,
            splitter: Plane2::default(),
            split_center: Point2::origin(),
            solid: false,
        }
    }

    /// Back to an empty leaf. Child handles are dropped, not freed.
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub const fn left(&self) -> Option<NodeIndex> {
        self.left
    }

    #[inline]
    pub const fn right(&self) -> Option<NodeIndex> {
        self.right
    }

    #[inline]
    pub const fn splitter(&self) -> &Plane2 {
        &self.splitter
    }

    #[inline]
    pub const fn split_center(&self) -> &Point2<Real> {
        &self.split_center
    }

    #[inline]
    pub const fn is_solid(&self) -> bool {
        self.solid
    }

    #[inline]
    pub const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub const fn state(&self) -> NodeState {
        if !self.is_leaf() {
            NodeState::Split
        } else if self.solid {
            NodeState::Solid
        } else {
            NodeState::Empty
        }
    }
}
