//! `gasbox`: a 2-D hard-disk gas in a rectangular box.
//!
//! Particles move under a fixed-step integrator (explicit Euler or
//! velocity-Verlet), bounce specularly off the walls and collide elastically
//! with each other through an exhaustive pairwise pass. Total kinetic energy
//! and the wall-collision count are tracked to validate the physics.
//!
//! ```no_run
//! use gasbox::core::{Integrator, SimBox};
//! use gasbox::output::Trajectory;
//!
//! # fn main() -> gasbox::error::Result<()> {
//! let mut sb = SimBox::new(10.0, 10.0, Some(42))?;
//! sb.initialize_grid(25, 1.0, 0.1, 1.0)?;
//! let mut traj = Trajectory::create("gas_dilute.dat")?;
//! let report = sb.run(10.0, 0.001, 0.05, &mut traj, Integrator::Verlet)?;
//! println!("energy drift: {}", report.relative_energy_drift());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod output;

#[cfg(feature = "python")]
mod python;
