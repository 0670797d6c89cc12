//! Screen-space 2D primitives shared by the BSP, the coverage buffer and the write queue.

pub mod box2;
pub mod clip;
pub mod plane;

pub use box2::Box2;
pub use plane::Plane2;
