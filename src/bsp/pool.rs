//! Arena of solid BSP nodes with lazy subtree recycling.
//!
//! Freeing a node hands back its whole subtree in O(1): only the subtree
//! root goes on the free list. When [`NodePool::alloc`] later reuses that
//! root it pushes the two children as new free subtree roots, so the cost
//! of taking a large tree apart is spread over later allocations.

use crate::bsp::node::{NodeIndex, SolidBspNode};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    /// Handed out by `alloc` (or part of a freed subtree not yet split)
    Live,
    /// Root of a subtree on the free list
    Free,
}

#[derive(Debug, Clone)]
struct PoolSlot {
    node: SolidBspNode,
    state: SlotState,
}

/// Counters reported by [`NodePool::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Nodes ever created by the pool
    pub nodes: usize,
    /// Free subtree roots waiting for reuse
    pub free_roots: usize,
}

/// A pool of solid BSP nodes, owned by one culling context.
#[derive(Debug, Default)]
pub struct NodePool {
    slots: Vec<PoolSlot>,
    freed: Vec<NodeIndex>,
}

impl NodePool {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            freed: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            freed: Vec::new(),
        }
    }

    /// Get an empty node (no children, not solid).
    pub fn alloc(&mut self) -> NodeIndex {
        if let Some(index) = self.freed.pop() {
            let slot = &mut self.slots[index.index()];
            let (left, right) = (slot.node.left, slot.node.right);
            slot.node.reset();
            slot.state = SlotState::Live;

            for child in [left, right].into_iter().flatten() {
                self.slots[child.index()].state = SlotState::Free;
                self.freed.push(child);
            }
            return index;
        }

        let index = NodeIndex::new(self.slots.len());
        self.slots.push(PoolSlot {
            node: SolidBspNode::new(),
            state: SlotState::Live,
        });
        index
    }

    /// Give a node, and with it its whole subtree, back to the pool.
    ///
    /// Only nodes obtained from this pool may be freed, and only once.
    pub fn free(&mut self, index: NodeIndex) {
        debug_assert!(
            index.index() < self.slots.len(),
            "node {index} was not allocated from this pool"
        );
        let Some(slot) = self.slots.get_mut(index.index()) else {
            return;
        };
        debug_assert!(slot.state == SlotState::Live, "node {index} freed twice");
        if slot.state == SlotState::Free {
            return;
        }
        slot.state = SlotState::Free;
        self.freed.push(index);
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> &SolidBspNode {
        &self.slots[index.index()].node
    }

    #[inline]
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut SolidBspNode {
        &mut self.slots[index.index()].node
    }

    /// True if `index` is currently the root of a free subtree.
    pub fn is_free(&self, index: NodeIndex) -> bool {
        self.slots
            .get(index.index())
            .is_some_and(|slot| slot.state == SlotState::Free)
    }

    /// Nodes ever created by this pool, live or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Free subtree roots waiting for reuse.
    #[inline]
    pub fn free_len(&self) -> usize {
        self.freed.len()
    }

    /// Drop every node. Indices handed out before are invalid afterwards.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.freed.clear();
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            nodes: self.slots.len(),
            free_roots: self.freed.len(),
        }
    }
}

impl fmt::Display for NodePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        write!(
            f,
            "node pool: {} nodes, {} free subtrees",
            stats.nodes, stats.free_roots
        )
    }
}
