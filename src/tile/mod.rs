//! Coverage tile geometry and the bitmask type holding one tile column.
//!
//! A tile is `NUM_TILECOL` columns wide and `NUM_TILEROW` rows high, and each
//! column is one [`TileCol`] with a bit per row. Both sizes are powers of two
//! and the column type is picked so that its width equals `NUM_TILEROW`.

pub mod tilecol;

pub use tilecol::{TileCol32, TileCol64, TileMask};

#[cfg(not(feature = "narrow-tiles"))]
pub const SHIFT_TILECOL: u32 = 5;
#[cfg(not(feature = "narrow-tiles"))]
pub const SHIFT_TILEROW: u32 = 6;
#[cfg(not(feature = "narrow-tiles"))]
pub type TileCol = TileCol64;

#[cfg(feature = "narrow-tiles")]
pub const SHIFT_TILECOL: u32 = 6;
#[cfg(feature = "narrow-tiles")]
pub const SHIFT_TILEROW: u32 = 5;
#[cfg(feature = "narrow-tiles")]
pub type TileCol = TileCol32;

pub const NUM_TILECOL: usize = 1 << SHIFT_TILECOL;
pub const NUM_TILEROW: usize = 1 << SHIFT_TILEROW;
/// Depth values per tile, one per 8×8 pixel block.
pub const NUM_DEPTH: usize = (NUM_TILEROW / 8) * (NUM_TILECOL / 8);

const _: () = assert!(NUM_TILEROW == <TileCol as TileMask>::BITS);
const _: () = assert!(NUM_TILECOL >= 8 && NUM_TILEROW >= 8);
