//! Ray-triangle intersection accelerator for static meshes.
//!
//! The accelerator is a linear BVH: triangles are ordered along a Morton
//! curve over their centroids and the tree above them is grown bottom-up,
//! in a single parallel pass where the two workers meeting at every parent
//! hand over through a lock-free rendezvous slot. Queries walk the finished
//! tree iteratively with a small fixed stack, pruning by slab tests and
//! resolving leaves with Möller-Trumbore.
//!
//! Geometry is borrowed, never copied; once built, an accelerator is
//! immutable and queries can run from any number of threads.

mod accelerator;
mod bounding_box;
mod builder;
mod error;
mod geometry;
mod hit;
mod leaves;
mod morton;
mod node;
mod ray;
mod triangle;

pub use self::accelerator::*;
pub use self::bounding_box::*;
pub use self::error::*;
pub use self::geometry::*;
pub use self::hit::*;
pub use self::morton::*;
pub use self::node::*;
pub use self::ray::*;
pub use self::triangle::*;
