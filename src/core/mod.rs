//! Core simulation types for the hard-disk box.
//!
//! `particle` is the leaf: one disk and its pairwise operations. `simbox`
//! owns the ensemble and drives stepping; `diagnostics` summarizes it.

pub mod diagnostics;
pub mod integrator;
pub mod particle;
pub mod simbox;

pub use integrator::Integrator;
pub use particle::{Particle, WallHit};
pub use simbox::{RunReport, SimBox};
