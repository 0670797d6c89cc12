// Scalar used for screen coordinates and depths.
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Distance in pixels within which a point counts as lying on an edge.
///
/// Outline classification (left of, right of, on a line) and the degenerate
/// region check both compare against this value. `DYNAVIS_TOLERANCE` read at
/// compile time replaces the default, and [`set_tolerance`] replaces it at run
/// time if called before the first classification.
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_tolerance() -> Real {
    #[cfg(feature = "f32")]
    {
        1e-3
    }
    #[cfg(feature = "f64")]
    {
        1e-6
    }
}

/// Edge classification tolerance in pixels, fixed on first use.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        option_env!("DYNAVIS_TOLERANCE")
            .and_then(|value| Real::from_str(value).ok())
            .map_or_else(default_tolerance, |value| value.max(Real::EPSILON))
    })
}

/// Pick the tolerance before any outline is classified. Later calls, or
/// calls after [`tolerance`] was first read, have no effect.
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}
