//! Validation errors

use crate::float_types::Real;
use nalgebra::Point2;

/// All the possible validation issues we might encounter
///
/// Culling itself never fails; these are only produced when building inputs
/// or configuration up front.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A polygon outline has fewer than three usable vertices
    #[error("(TooFewPoints) an outline needs at least 3 distinct vertices, got {0}")]
    TooFewPoints(usize),
    /// A coordinate is NaN or infinite
    #[error("(InvalidCoordinate) the coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point2<Real>),
    /// A screen or coverage buffer with no pixels
    #[error("(EmptyScreen) screen size {width}x{height} has no pixels")]
    EmptyScreen { width: usize, height: usize },
    /// Minimum occluder area must be finite and not negative
    #[error("(InvalidOccluderArea) minimum occluder area {0} is not a finite, non-negative value")]
    InvalidOccluderArea(Real),
}
