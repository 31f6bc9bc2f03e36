//! Ensemble diagnostics for a box of disks.
//!
//! Units follow the simulation: Boltzmann's constant is taken as 1, so the
//! effective temperature of a 2-D gas is `<m v^2> / 2`.

use crate::core::Particle;
use crate::error::{Error, Result};

/// Summary statistics of particle speeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub max: f64,
}

impl SpeedStats {
    /// Returns `None` for an empty collection.
    pub fn from_particles(particles: &[Particle]) -> Option<Self> {
        if particles.is_empty() {
            return None;
        }
        let n = particles.len() as f64;
        let mean = particles.iter().map(Particle::speed).sum::<f64>() / n;
        let var = particles
            .iter()
            .map(|p| {
                let d = p.speed() - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let max = particles.iter().map(Particle::speed).fold(0.0, f64::max);
        Some(Self {
            count: particles.len(),
            mean,
            std_dev: var.sqrt(),
            max,
        })
    }
}

/// Effective temperature from 2-D equipartition: `T = <m |v|^2> / 2`.
///
/// Zero for an empty collection.
pub fn effective_temperature(particles: &[Particle]) -> f64 {
    if particles.is_empty() {
        return 0.0;
    }
    let twice_ke: f64 = particles.iter().map(|p| 2.0 * p.kinetic_energy()).sum();
    0.5 * twice_ke / particles.len() as f64
}

/// 2-D Maxwell-Boltzmann speed density `(m/T) v exp(-m v^2 / (2T))`.
pub fn maxwell_boltzmann_2d(v: f64, temperature: f64, mass: f64) -> f64 {
    if temperature <= 0.0 || v < 0.0 {
        return 0.0;
    }
    (mass / temperature) * v * (-mass * v * v / (2.0 * temperature)).exp()
}

/// Histogram of particle speeds.
///
/// Returns `(edges, counts)` with `bins + 1` edges. `range` defaults to
/// `[0, max speed]`; speeds outside the range are dropped, the upper edge is
/// inclusive.
pub fn speed_histogram(
    particles: &[Particle],
    bins: usize,
    range: Option<(f64, f64)>,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if bins == 0 {
        return Err(Error::InvalidParam("bins must be > 0".into()));
    }
    let (lo, hi) = match range {
        Some((lo, hi)) => (lo, hi),
        None => {
            let max = particles.iter().map(Particle::speed).fold(0.0, f64::max);
            (0.0, if max > 0.0 { max } else { 1.0 })
        }
    };
    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return Err(Error::InvalidParam(
            "histogram range must be finite with max > min".into(),
        ));
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|b| lo + b as f64 * width).collect();
    let mut counts = vec![0.0_f64; bins];
    for s in particles.iter().map(Particle::speed) {
        if s < lo || s > hi {
            continue;
        }
        let idx = (((s - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1.0;
    }
    Ok((edges, counts))
}

/// `|e_final / e_initial - 1|`, or 0 when the initial energy is zero.
pub fn relative_energy_drift(e_initial: f64, e_final: f64) -> f64 {
    if e_initial == 0.0 {
        return 0.0;
    }
    (e_final / e_initial - 1.0).abs()
}

/// Wall collisions per unit time, a proxy for pressure on the walls.
pub fn wall_collision_rate(wall_collisions: u64, elapsed: f64) -> Result<f64> {
    if !elapsed.is_finite() || elapsed <= 0.0 {
        return Err(Error::InvalidParam("elapsed time must be finite and > 0".into()));
    }
    Ok(wall_collisions as f64 / elapsed)
}
