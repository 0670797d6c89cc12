//! Screen sized grid of [`CoverageTile`]s.
//!
//! Pixel `(x, y)` spans `[x, x + 1] × [y, y + 1]` in screen coordinates.
//! Writing is strict: only pixels lying completely inside an occluder are
//! covered. Testing is generous: every pixel a query polygon touches is
//! looked at. Together this keeps the buffer conservative.

use crate::bsp::Coverage;
use crate::covbuf::tile::CoverageTile;
use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::geometry::Box2;
use crate::polyedge::Poly2DEdges;
use crate::tile::{NUM_TILECOL, NUM_TILEROW, SHIFT_TILECOL, SHIFT_TILEROW, TileCol, TileMask};
use nalgebra::Point2;
use std::fmt::Write;
use std::ops::Range;

#[derive(Debug, Clone)]
pub struct TiledCoverageBuffer {
    width: usize,
    height: usize,
    width_tiles: usize,
    height_tiles: usize,
    tiles: Vec<CoverageTile>,
}

/// Vertical extent of a convex loop along the line `x = at`.
fn column_span(verts: &[Point2<Real>], at: Real) -> Option<(Real, Real)> {
    let mut span: Option<(Real, Real)> = None;
    let mut include = |y: Real| {
        span = Some(match span {
            Some((lo, hi)) => (lo.min(y), hi.max(y)),
            None => (y, y),
        });
    };
    for (i, a) in verts.iter().enumerate() {
        let b = &verts[(i + 1) % verts.len()];
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        if at < x0 || at > x1 {
            continue;
        }
        if x1 - x0 <= Real::EPSILON {
            include(a.y);
            include(b.y);
        } else {
            include(a.y + (at - a.x) * (b.y - a.y) / (b.x - a.x));
        }
    }
    span
}

/// Vertical extent of a convex loop inside the strip `x0 <= x <= x1`.
fn strip_span(verts: &[Point2<Real>], x0: Real, x1: Real) -> Option<(Real, Real)> {
    let mut span = None;
    let mut merge = |other: Option<(Real, Real)>| {
        if let Some((lo, hi)) = other {
            span = Some(match span {
                Some((a, b)) => (lo.min(a), hi.max(b)),
                None => (lo, hi),
            });
        }
    };
    merge(column_span(verts, x0));
    merge(column_span(verts, x1));
    for v in verts.iter().filter(|v| v.x >= x0 && v.x <= x1) {
        merge(Some((v.y, v.y)));
    }
    span
}

/// Clamp `[lo, hi)` in pixel units to `0..limit`.
fn clamp_range(lo: Real, hi: Real, limit: usize) -> Range<usize> {
    let lo = lo.max(0.0);
    let hi = hi.min(limit as Real);
    if hi <= lo {
        return 0..0;
    }
    (lo as usize)..(hi as usize)
}

/// Pixels touched by the closed interval `[lo, hi]`, at least one.
fn touched(lo: Real, hi: Real, limit: usize) -> Range<usize> {
    let first = lo.floor();
    let last = hi.ceil().max(first + 1.0);
    clamp_range(first, last, limit)
}

impl TiledCoverageBuffer {
    /// Buffer for a `width` × `height` pixel screen, all uncovered.
    pub fn new(width: usize, height: usize) -> Result<Self, ValidationError> {
        if width == 0 || height == 0 {
            return Err(ValidationError::EmptyScreen { width, height });
        }
        let width_tiles = width.div_ceil(NUM_TILECOL);
        let height_tiles = height.div_ceil(NUM_TILEROW);
        Ok(Self {
            width,
            height,
            width_tiles,
            height_tiles,
            tiles: vec![CoverageTile::new(); width_tiles * height_tiles],
        })
    }

    /// Uncover everything, keeping the allocation.
    pub fn initialize(&mut self) {
        for tile in &mut self.tiles {
            tile.make_empty();
        }
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Tile grid size as (columns, rows).
    #[inline]
    pub const fn tile_grid(&self) -> (usize, usize) {
        (self.width_tiles, self.height_tiles)
    }

    pub fn tile(&self, tx: usize, ty: usize) -> &CoverageTile {
        &self.tiles[ty * self.width_tiles + tx]
    }

    pub fn screen_box(&self) -> Box2 {
        Box2::from_coords(0.0, 0.0, self.width as Real, self.height as Real)
    }

    /// Covered pixels on the whole screen.
    pub fn covered_count(&self) -> usize {
        self.tiles.iter().map(CoverageTile::covered_count).sum()
    }

    /// Masks of rows `rows` in pixel column `x`, one per tile touched, as
    /// (tile index, column in tile, mask).
    fn column_masks(
        &self,
        x: usize,
        rows: Range<usize>,
    ) -> impl Iterator<Item = (usize, usize, TileCol)> + use<> {
        let width_tiles = self.width_tiles;
        let tx = x >> SHIFT_TILECOL;
        let col = x & (NUM_TILECOL - 1);
        let end = rows.end;
        let mut y = rows.start;
        std::iter::from_fn(move || {
            if y >= end {
                return None;
            }
            let ty = y >> SHIFT_TILEROW;
            let tile_end = ((ty + 1) << SHIFT_TILEROW).min(end);
            let mask = TileCol::from_bit_range(y & (NUM_TILEROW - 1), (tile_end - 1) & (NUM_TILEROW - 1));
            y = tile_end;
            Some((ty * width_tiles + tx, col, mask))
        })
    }

    fn test_column_rows(&self, x: usize, rows: Range<usize>, depth: Real) -> bool {
        self.column_masks(x, rows)
            .any(|(index, col, mask)| self.tiles[index].test_column(col, &mask, depth))
    }

    /// Cover the pixels lying completely inside a convex polygon, at
    /// `max_depth` (the farthest depth of the occluder).
    ///
    /// Returns true if a pixel was newly covered.
    pub fn insert_polygon(&mut self, verts: &[Point2<Real>], max_depth: Real) -> bool {
        let poly = Poly2DEdges::from_vertices(verts);
        if poly.len() < 3 {
            return false;
        }
        let verts = poly.vertices();
        let bbox = poly.bounding_box();

        let mut changed = false;
        for x in clamp_range(bbox.mins.x.ceil(), bbox.maxs.x.floor(), self.width) {
            let (left, right) = (x as Real, x as Real + 1.0);
            let (Some((lo0, hi0)), Some((lo1, hi1))) =
                (column_span(&verts, left), column_span(&verts, right))
            else {
                continue;
            };
            // rows y with lo <= y and y + 1 <= hi
            let rows = clamp_range(lo0.max(lo1).ceil(), hi0.min(hi1).floor(), self.height);
            for (index, col, mask) in self.column_masks(x, rows) {
                changed |= self.tiles[index].write_column(col, &mask, max_depth);
            }
        }
        changed
    }

    /// True if some pixel touched by the convex polygon is visible at
    /// `min_depth` (the nearest depth of the tested object). Polygons
    /// entirely off screen are not visible.
    pub fn test_polygon(&self, verts: &[Point2<Real>], min_depth: Real) -> bool {
        self.classify(verts, min_depth, true).visible
    }

    /// Whether the pixels touched by the convex polygon are visible at
    /// `min_depth` and whether any of them is hidden. A polygon with
    /// `visible` set and `solid` clear is fully visible.
    pub fn classify_polygon(&self, verts: &[Point2<Real>], min_depth: Real) -> Coverage {
        self.classify(verts, min_depth, false)
    }

    fn classify(&self, verts: &[Point2<Real>], min_depth: Real, visible_only: bool) -> Coverage {
        let mut coverage = Coverage::default();
        let poly = Poly2DEdges::from_vertices(verts);
        if poly.len() < 3 {
            return coverage;
        }
        let verts = poly.vertices();
        let bbox = poly.bounding_box();

        for x in touched(bbox.mins.x, bbox.maxs.x, self.width) {
            let x0 = (x as Real).max(bbox.mins.x);
            let x1 = (x as Real + 1.0).min(bbox.maxs.x);
            let Some((lo, hi)) = strip_span(&verts, x0, x1) else {
                continue;
            };
            for (index, col, mask) in self.column_masks(x, touched(lo, hi, self.height)) {
                self.tiles[index].classify_column(col, &mask, min_depth, &mut coverage);
                if coverage.visible && (visible_only || coverage.solid) {
                    return coverage;
                }
            }
        }
        coverage
    }

    /// Like [`Self::test_polygon`] for an axis aligned box.
    pub fn test_rectangle(&self, bbox: &Box2, min_depth: Real) -> bool {
        if bbox.is_empty() {
            return false;
        }
        let rows = touched(bbox.mins.y, bbox.maxs.y, self.height);
        touched(bbox.mins.x, bbox.maxs.x, self.width)
            .any(|x| self.test_column_rows(x, rows.clone(), min_depth))
    }

    /// Visibility of a single point at `min_depth`.
    pub fn test_point(&self, p: &Point2<Real>, min_depth: Real) -> bool {
        if p.x < 0.0 || p.y < 0.0 {
            return false;
        }
        let (x, y) = (p.x as usize, p.y as usize);
        if x >= self.width || y >= self.height {
            return false;
        }
        let tile = self.tile(x >> SHIFT_TILECOL, y >> SHIFT_TILEROW);
        tile.test_point(x & (NUM_TILECOL - 1), y & (NUM_TILEROW - 1), min_depth)
    }

    /// One line per non empty tile.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "coverage buffer {}x{} ({}x{} tiles), {} pixels covered",
            self.width,
            self.height,
            self.width_tiles,
            self.height_tiles,
            self.covered_count()
        );
        for ty in 0..self.height_tiles {
            for tx in 0..self.width_tiles {
                let tile = self.tile(tx, ty);
                if tile.is_empty() {
                    continue;
                }
                let _ = writeln!(
                    out,
                    "  tile ({tx},{ty}): {} covered{} max depth {:.3}",
                    tile.covered_count(),
                    if tile.is_full() { " (full)" } else { "" },
                    tile.max_depth()
                );
            }
        }
        out
    }
}
