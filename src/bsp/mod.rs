//! Solid [BSP](https://en.wikipedia.org/wiki/Binary_space_partitioning) tree for 2D occlusion
//!
//! This module splits the tree into its node type, the pooled node arena
//! and the tree algorithms, so that the pool can be shared by several trees
//! of one culling context.

pub mod node;
pub mod pool;
pub mod tree;

pub use node::{NodeIndex, NodeState, SolidBspNode};
pub use pool::{NodePool, PoolStats};
pub use tree::{Coverage, SolidBsp};
