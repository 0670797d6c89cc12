//! Tiled coverage buffer with per block depth.
//!
//! The screen is cut into tiles of `NUM_TILECOL` × `NUM_TILEROW` pixels.
//! Each tile stores one [`TileCol`](crate::tile::TileCol) bitmask per pixel
//! column and a depth per 8×8 block. Occluders are written by the culler from
//! its [`WriteQueue`](crate::wqueue::WriteQueue) only when a test needs them.

pub mod buffer;
pub mod tile;

pub use buffer::TiledCoverageBuffer;
pub use tile::CoverageTile;
