//! Conservative **occlusion culling** in screen space, built around a solid 2D
//! [BSP](bsp) tree, a tiled [coverage buffer](covbuf) and a depth ordered
//! [write queue](wqueue).
//!
//! Objects are handed over as projected outlines, nearest first. Each outline
//! is tested against the occluders drawn before it and can then become an
//! occluder itself. A verdict of [`Visibility::Occluded`] is only given when
//! no part of the outline can be seen.
//!
//! # Features
//! #### Default
//! - **f32**: use f32 as Real
//!
//! #### Optional
//! - **f64**: use f64 as Real, this conflicts with f32
//! - **parallel**: use rayon for batch visibility tests
//! - **narrow-tiles**: 64×32 coverage tiles with 32 bit columns instead of 32×64

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod bsp;
pub mod covbuf;
pub mod culler;
pub mod errors;
pub mod float_types;
pub mod geometry;
pub mod polyedge;
pub mod tile;
pub mod wqueue;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use bsp::{NodePool, SolidBsp};
pub use covbuf::TiledCoverageBuffer;
pub use culler::{CullObject, CullerConfig, OcclusionMode, Visibility, VisibilityCuller};
pub use errors::ValidationError;
pub use float_types::Real;
pub use geometry::{Box2, Plane2};
pub use polyedge::Poly2DEdges;
pub use tile::TileCol;
pub use wqueue::WriteQueue;
