//! Visibility culler: the solid BSP, coverage buffer and write queue behind
//! one per-frame interface.
//!
//! Objects are expected front to back. Each one is tested against what was
//! drawn before it and, when it is visible and marked as an occluder, added
//! so it can hide what follows.

use crate::bsp::{Coverage, NodePool, PoolStats, SolidBsp};
use crate::covbuf::TiledCoverageBuffer;
use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::geometry::Box2;
use crate::polyedge::Poly2DEdges;
use crate::wqueue::WriteQueue;
use log::{debug, trace};
use nalgebra::Point2;
use std::fmt::Write;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Which structure holds the occluders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OcclusionMode {
    /// Exact 2D coverage without depth. Relies on strict front to back order.
    #[default]
    SolidBsp,
    /// Pixel coverage with block depth, fed lazily through the write queue.
    CoverageBuffer,
}

/// Options for a [`VisibilityCuller`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CullerConfig {
    pub width: usize,
    pub height: usize,
    pub mode: OcclusionMode,
    /// Occluders with a smaller screen area are ignored.
    pub min_occluder_area: Real,
}

impl Default for CullerConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            mode: OcclusionMode::default(),
            min_occluder_area: 1.0,
        }
    }
}

impl CullerConfig {
    pub const fn with_screen(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub const fn with_mode(mut self, mode: OcclusionMode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn with_min_occluder_area(mut self, area: Real) -> Self {
        self.min_occluder_area = area;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.width == 0 || self.height == 0 {
            return Err(ValidationError::EmptyScreen {
                width: self.width,
                height: self.height,
            });
        }
        if !self.min_occluder_area.is_finite() || self.min_occluder_area < 0.0 {
            return Err(ValidationError::InvalidOccluderArea(self.min_occluder_area));
        }
        Ok(())
    }

    pub fn screen_box(&self) -> Box2 {
        Box2::from_coords(0.0, 0.0, self.width as Real, self.height as Real)
    }
}

/// Verdict for one tested object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Entirely hidden behind earlier occluders (or off screen).
    Occluded,
    /// Some part is visible and some part is hidden.
    PartiallyVisible,
    /// Nothing drawn so far hides any part of it.
    FullyVisible,
}

impl Visibility {
    #[inline]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Occluded)
    }
}

impl From<Coverage> for Visibility {
    fn from(coverage: Coverage) -> Self {
        if coverage.is_occluded() {
            Self::Occluded
        } else if coverage.is_fully_visible() {
            Self::FullyVisible
        } else {
            Self::PartiallyVisible
        }
    }
}

/// One object of a frame: its projected outline and depth range.
#[derive(Debug, Clone, PartialEq)]
pub struct CullObject {
    pub outline: Vec<Point2<Real>>,
    pub min_depth: Real,
    pub max_depth: Real,
    /// Add the outline as an occluder when the object turns out visible.
    pub occluder: bool,
}

impl CullObject {
    pub fn new(outline: Vec<Point2<Real>>, min_depth: Real, max_depth: Real) -> Self {
        Self {
            outline,
            min_depth,
            max_depth,
            occluder: false,
        }
    }

    pub fn as_occluder(mut self) -> Self {
        self.occluder = true;
        self
    }
}

/// Per frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    pub frame: u64,
    pub tested: usize,
    pub occluded: usize,
    pub partially_visible: usize,
    pub fully_visible: usize,
    pub occluders_added: usize,
    pub occluders_rejected: usize,
    /// Queued occluders actually written to the coverage buffer.
    pub queue_writes: usize,
    pub pool: PoolStats,
}

/// Occlusion culling context. Owns its node pool; nothing is shared
/// between cullers.
#[derive(Debug)]
pub struct VisibilityCuller {
    config: CullerConfig,
    pool: NodePool,
    bsp: SolidBsp,
    covbuf: Option<TiledCoverageBuffer>,
    queue: WriteQueue<usize>,
    // outlines of queued occluders, indexed by the queue handles
    occluders: Vec<Vec<Point2<Real>>>,
    stats: CullStats,
}

impl VisibilityCuller {
    pub fn new(config: CullerConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let mut pool = NodePool::new();
        let bsp = SolidBsp::new(&mut pool, config.screen_box());
        let covbuf = match config.mode {
            OcclusionMode::SolidBsp => None,
            OcclusionMode::CoverageBuffer => {
                Some(TiledCoverageBuffer::new(config.width, config.height)?)
            },
        };
        debug!(
            "visibility culler {}x{} in {:?} mode",
            config.width, config.height, config.mode
        );
        Ok(Self {
            config,
            pool,
            bsp,
            covbuf,
            queue: WriteQueue::new(),
            occluders: Vec::new(),
            stats: CullStats::default(),
        })
    }

    #[inline]
    pub const fn config(&self) -> &CullerConfig {
        &self.config
    }

    #[inline]
    pub const fn bsp(&self) -> &SolidBsp {
        &self.bsp
    }

    #[inline]
    pub const fn pool(&self) -> &NodePool {
        &self.pool
    }

    #[inline]
    pub const fn coverage_buffer(&self) -> Option<&TiledCoverageBuffer> {
        self.covbuf.as_ref()
    }

    /// Occluders waiting in the write queue.
    #[inline]
    pub const fn pending_occluders(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> CullStats {
        CullStats {
            pool: self.pool.stats(),
            ..self.stats
        }
    }

    /// Forget all occluders of the previous frame.
    pub fn begin_frame(&mut self) {
        if self.stats.frame > 0 {
            debug!(
                "frame {} done: {} tested, {} occluded, {} occluders, {} queue writes",
                self.stats.frame,
                self.stats.tested,
                self.stats.occluded,
                self.stats.occluders_added,
                self.stats.queue_writes
            );
        }
        self.bsp.make_empty(&mut self.pool);
        if let Some(covbuf) = &mut self.covbuf {
            covbuf.initialize();
        }
        self.queue.initialize();
        self.occluders.clear();
        self.stats = CullStats {
            frame: self.stats.frame + 1,
            ..CullStats::default()
        };
        debug!("{}", self.pool);
    }

    /// Write every queued occluder that is in front of `min_depth` and
    /// overlaps `bbox`.
    fn flush_queue(&mut self, bbox: &Box2, min_depth: Real) {
        let Some(covbuf) = &mut self.covbuf else {
            return;
        };
        while let Some((id, depth)) = self.queue.fetch(bbox, min_depth) {
            covbuf.insert_polygon(&self.occluders[id], depth);
            self.stats.queue_writes += 1;
        }
    }

    /// Test an outline whose nearest point is at `min_depth`.
    ///
    /// Outlines with no area and outlines entirely off screen are
    /// `Occluded`. Concave outlines are tested by their bounding box.
    pub fn test_object(&mut self, outline: &[Point2<Real>], min_depth: Real) -> Visibility {
        let poly = Poly2DEdges::from_vertices(outline);
        let hull;
        let outline = if poly.len() >= 3 && !poly.is_convex() {
            hull = poly.bounding_box().corners();
            &hull[..]
        } else {
            outline
        };

        let visibility = match self.config.mode {
            OcclusionMode::SolidBsp => Visibility::from(self.bsp.classify_polygon(&self.pool, outline)),
            OcclusionMode::CoverageBuffer => {
                let bbox = Box2::from_points(outline);
                self.flush_queue(&bbox, min_depth);
                self.covbuf
                    .as_ref()
                    .map_or(Visibility::Occluded, |covbuf| {
                        Visibility::from(covbuf.classify_polygon(outline, min_depth))
                    })
            },
        };

        self.stats.tested += 1;
        match visibility {
            Visibility::Occluded => self.stats.occluded += 1,
            Visibility::PartiallyVisible => self.stats.partially_visible += 1,
            Visibility::FullyVisible => self.stats.fully_visible += 1,
        }
        visibility
    }

    /// Register an outline as occluder at `max_depth` (its farthest point).
    ///
    /// Only convex outlines of at least `min_occluder_area` are accepted;
    /// anything else could hide more than it covers. Returns whether the
    /// occluder was taken.
    pub fn add_occluder(&mut self, outline: &[Point2<Real>], max_depth: Real) -> bool {
        let poly = Poly2DEdges::from_vertices(outline);
        if !poly.is_convex() || poly.area() < self.config.min_occluder_area {
            trace!(
                "occluder rejected: {} edges, area {:.3}",
                poly.len(),
                poly.area()
            );
            self.stats.occluders_rejected += 1;
            return false;
        }

        match self.config.mode {
            OcclusionMode::SolidBsp => {
                self.bsp.insert_edges(&mut self.pool, &poly);
            },
            OcclusionMode::CoverageBuffer => {
                self.queue
                    .append(poly.bounding_box(), max_depth, self.occluders.len());
                self.occluders.push(poly.vertices());
            },
        }
        self.stats.occluders_added += 1;
        true
    }

    /// Test one object and, if visible and flagged, make it an occluder.
    pub fn process(&mut self, object: &CullObject) -> Visibility {
        let visibility = self.test_object(&object.outline, object.min_depth);
        trace!(
            "object at depth {:.3}..{:.3}: {:?}",
            object.min_depth, object.max_depth, visibility
        );
        if object.occluder && visibility.is_visible() {
            self.add_occluder(&object.outline, object.max_depth);
        }
        visibility
    }

    /// Cull a whole frame. Objects are processed nearest first (by
    /// `min_depth`); verdicts come back in input order.
    pub fn cull_frame(&mut self, objects: &[CullObject]) -> Vec<Visibility> {
        self.begin_frame();
        let mut order: Vec<usize> = (0..objects.len()).collect();
        order.sort_by(|&a, &b| objects[a].min_depth.total_cmp(&objects[b].min_depth));

        let mut verdicts = vec![Visibility::Occluded; objects.len()];
        for index in order {
            verdicts[index] = self.process(&objects[index]);
        }
        debug!(
            "frame {}: {}/{} visible",
            self.stats.frame,
            verdicts.iter().filter(|v| v.is_visible()).count(),
            objects.len()
        );
        verdicts
    }

    /// Test many outlines against the current BSP without changing it.
    #[cfg(not(feature = "parallel"))]
    pub fn test_batch(&self, outlines: &[Vec<Point2<Real>>]) -> Vec<bool> {
        outlines
            .iter()
            .map(|outline| self.bsp.test_polygon(&self.pool, outline))
            .collect()
    }

    /// Test many outlines against the current BSP without changing it, in parallel.
    #[cfg(feature = "parallel")]
    pub fn test_batch(&self, outlines: &[Vec<Point2<Real>>]) -> Vec<bool> {
        outlines
            .par_iter()
            .map(|outline| self.bsp.test_polygon(&self.pool, outline))
            .collect()
    }

    /// Diagnostic listing of the culler state.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let stats = self.stats();
        let _ = writeln!(out, "frame {} ({:?})", stats.frame, self.config.mode);
        let _ = writeln!(
            out,
            "tested {}: {} occluded, {} partial, {} full",
            stats.tested, stats.occluded, stats.partially_visible, stats.fully_visible
        );
        let _ = writeln!(
            out,
            "occluders {} added, {} rejected",
            stats.occluders_added, stats.occluders_rejected
        );
        let _ = writeln!(out, "{}", self.pool);
        out.push_str(&self.bsp.dump(&self.pool));
        if let Some(covbuf) = &self.covbuf {
            out.push_str(&covbuf.dump());
            out.push_str(&self.queue.to_string());
        }
        out
    }
}
