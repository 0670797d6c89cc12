//! One tile of the coverage buffer.

use crate::bsp::Coverage;
use crate::float_types::Real;
use crate::tile::{NUM_DEPTH, NUM_TILECOL, NUM_TILEROW, TileCol, TileMask};

const BLOCKS_PER_ROW: usize = NUM_TILECOL / 8;
const BYTES_PER_COL: usize = NUM_TILEROW / 8;

/// A `NUM_TILECOL` × `NUM_TILEROW` block of coverage bits.
///
/// Depth is kept per 8×8 pixel block: `depth[i]` is the largest depth of any
/// occluder that covered a pixel in block `i`, so a covered pixel hides
/// everything farther than its block depth.
#[derive(Debug, Clone)]
pub struct CoverageTile {
    coverage: [TileCol; NUM_TILECOL],
    depth: [Real; NUM_DEPTH],
    tile_max_depth: Real,
    tile_empty: bool,
}

impl Default for CoverageTile {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
const fn block_index(col: usize, byte: usize) -> usize {
    byte * BLOCKS_PER_ROW + col / 8
}

impl CoverageTile {
    pub const fn new() -> Self {
        Self {
            coverage: [TileCol::EMPTY; NUM_TILECOL],
            depth: [0.0; NUM_DEPTH],
            tile_max_depth: 0.0,
            tile_empty: true,
        }
    }

    pub fn make_empty(&mut self) {
        if self.tile_empty {
            return;
        }
        self.coverage = [TileCol::EMPTY; NUM_TILECOL];
        self.depth = [0.0; NUM_DEPTH];
        self.tile_max_depth = 0.0;
        self.tile_empty = true;
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.tile_empty
    }

    /// Every pixel of the tile is covered.
    pub fn is_full(&self) -> bool {
        !self.tile_empty && self.coverage.iter().all(TileMask::is_full)
    }

    #[inline]
    pub const fn max_depth(&self) -> Real {
        self.tile_max_depth
    }

    #[inline]
    pub fn column(&self, col: usize) -> &TileCol {
        &self.coverage[col]
    }

    /// Depth of the 8×8 block holding pixel (`col`, `row`).
    #[inline]
    pub fn block_depth(&self, col: usize, row: usize) -> Real {
        self.depth[block_index(col, row / 8)]
    }

    /// Cover the rows set in `mask` of column `col` with an occluder at
    /// `depth`. Returns true if a pixel was newly covered.
    pub fn write_column(&mut self, col: usize, mask: &TileCol, depth: Real) -> bool {
        debug_assert!(col < NUM_TILECOL);
        let mut fresh = *mask;
        fresh.and_inverted(&self.coverage[col]);
        if fresh.is_empty() {
            return false;
        }

        for byte in (0..BYTES_PER_COL).filter(|&byte| fresh.check_byte(byte)) {
            let block = &mut self.depth[block_index(col, byte)];
            if depth > *block {
                *block = depth;
            }
        }
        self.coverage[col] |= fresh;
        if self.tile_empty || depth > self.tile_max_depth {
            self.tile_max_depth = depth;
        }
        self.tile_empty = false;
        true
    }

    /// True if some row of `mask` in column `col` is visible at `depth`:
    /// either not covered, or its block is not in front of `depth`.
    pub fn test_column(&self, col: usize, mask: &TileCol, depth: Real) -> bool {
        debug_assert!(col < NUM_TILECOL);
        if mask.is_empty() {
            return false;
        }
        if self.tile_empty {
            return true;
        }
        let coverage = &self.coverage[col];
        if mask.test_inverted_mask(coverage) {
            return true;
        }
        if depth > self.tile_max_depth {
            return false;
        }
        (0..BYTES_PER_COL)
            .filter(|&byte| mask.check_byte(byte))
            .any(|byte| depth <= self.depth[block_index(col, byte)])
    }

    /// Like [`Self::test_column`], but also notes in `coverage` whether any
    /// row of `mask` is hidden at `depth`.
    pub fn classify_column(&self, col: usize, mask: &TileCol, depth: Real, coverage: &mut Coverage) {
        debug_assert!(col < NUM_TILECOL);
        if mask.is_empty() {
            return;
        }
        if self.tile_empty {
            coverage.visible = true;
            return;
        }
        let column = &self.coverage[col];
        if mask.test_inverted_mask(column) {
            coverage.visible = true;
        }
        let mut covered = *mask;
        covered &= *column;
        for byte in (0..BYTES_PER_COL).filter(|&byte| covered.check_byte(byte)) {
            if depth <= self.depth[block_index(col, byte)] {
                coverage.visible = true;
            } else {
                coverage.solid = true;
            }
        }
    }

    pub fn test_point(&self, col: usize, row: usize, depth: Real) -> bool {
        debug_assert!(col < NUM_TILECOL && row < NUM_TILEROW);
        !self.coverage[col].test_bit(row) || depth <= self.block_depth(col, row)
    }

    /// Covered pixels in this tile.
    pub fn covered_count(&self) -> usize {
        self.coverage
            .iter()
            .map(|col| (0..NUM_TILEROW).filter(|&row| col.test_bit(row)).count())
            .sum()
    }
}
