use crate::core::particle::{Particle, DIM};
use crate::core::Integrator;
use crate::error::{Error, Result};
use crate::output::Trajectory;
use log::{debug, info, warn};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

/// Placement trials per particle before `initialize_random` gives up on it.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

/// Simulation domain: a static axis-aligned `[0, width] x [0, height]` box
/// holding an ordered collection of hard disks.
///
/// The particle order is stable and defines the pair iteration order of the
/// collision pass. The random source is private to the box and only read by the
/// two initialization routines.
#[derive(Debug)]
pub struct SimBox {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    wall_collisions: u64,
    rng: StdRng,
}

/// Summary of a completed (or cancelled) [`SimBox::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub integrator: Integrator,
    pub steps: u64,
    pub snapshots: u64,
    pub final_time: f64,
    pub initial_energy: f64,
    pub final_energy: f64,
    pub wall_collisions: u64,
    pub cancelled: bool,
}

impl RunReport {
    /// `|E_final / E_initial - 1|`; zero for a system that started at rest.
    pub fn relative_energy_drift(&self) -> f64 {
        crate::core::diagnostics::relative_energy_drift(self.initial_energy, self.final_energy)
    }
}

impl SimBox {
    /// Create an empty box with extents `width` x `height`.
    ///
    /// `seed` makes initialization reproducible; `None` draws a seed from the
    /// thread-local generator.
    pub fn new(width: f64, height: f64, seed: Option<u64>) -> Result<Self> {
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::InvalidParam("width must be finite and > 0".into()));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(Error::InvalidParam("height must be finite and > 0".into()));
        }
        let rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };
        Ok(Self {
            width,
            height,
            particles: Vec::new(),
            wall_collisions: 0,
            rng,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for explicit setup. The collection itself stays fixed-size.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Append an explicitly constructed particle (for hand-built scenarios).
    pub fn push_particle(&mut self, p: Particle) {
        self.particles.push(p);
    }

    /// Remove all particles.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Total wall bounces since construction or the last reset.
    pub fn wall_collisions(&self) -> u64 {
        self.wall_collisions
    }

    pub fn reset_wall_collisions(&mut self) {
        self.wall_collisions = 0;
    }

    /// Lay out `n` particles on a regular grid with random velocities.
    ///
    /// The grid has `ceil(sqrt(n))` columns and as many rows as needed, evenly
    /// spaced at `width / (cols + 1)` and `height / (rows + 1)`, filled row by
    /// row. Velocity components are uniform in `[-v_max, v_max]`.
    /// Returns the number of particles placed (always `n`).
    pub fn initialize_grid(&mut self, n: usize, mass: f64, radius: f64, v_max: f64) -> Result<usize> {
        self.validate_species(mass, radius, v_max)?;
        self.particles.clear();
        if n == 0 {
            return Ok(0);
        }

        let cols = (n as f64).sqrt().ceil() as usize;
        let rows = n.div_ceil(cols);
        let sx = self.width / (cols + 1) as f64;
        let sy = self.height / (rows + 1) as f64;

        self.particles.reserve(n);
        'rows: for i in 0..rows {
            for j in 0..cols {
                if self.particles.len() == n {
                    break 'rows;
                }
                let x = (j + 1) as f64 * sx;
                let y = (i + 1) as f64 * sy;
                let vx = self.rng.random_range(-v_max..=v_max);
                let vy = self.rng.random_range(-v_max..=v_max);
                self.particles.push(Particle::new(x, y, vx, vy, mass, radius)?);
            }
        }

        info!("initialized {} particles on a {cols}x{rows} grid", self.particles.len());
        Ok(self.particles.len())
    }

    /// Place up to `n` non-overlapping particles uniformly at random.
    ///
    /// Each particle gets [`MAX_PLACEMENT_ATTEMPTS`] trials; one that finds no free
    /// spot is skipped, so the result may hold fewer than `n` particles. Returns
    /// the number placed.
    pub fn initialize_random(&mut self, n: usize, mass: f64, radius: f64, v_max: f64) -> Result<usize> {
        self.validate_species(mass, radius, v_max)?;
        self.particles.clear();
        self.particles.reserve(n);

        let (x_lo, x_hi) = (radius, self.width - radius);
        let (y_lo, y_hi) = (radius, self.height - radius);
        let mut skipped = 0usize;

        for id in 0..n {
            let mut placed = None;
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let x = self.rng.random_range(x_lo..=x_hi);
                let y = self.rng.random_range(y_lo..=y_hi);
                let candidate = Particle::new(x, y, 0.0, 0.0, mass, radius)?;
                if !self.particles.iter().any(|p| candidate.has_collision(p)) {
                    placed = Some(candidate);
                    break;
                }
            }

            match placed {
                Some(mut p) => {
                    p.v[0] = self.rng.random_range(-v_max..=v_max);
                    p.v[1] = self.rng.random_range(-v_max..=v_max);
                    self.particles.push(p);
                }
                None => {
                    warn!("could not place particle {id} after {MAX_PLACEMENT_ATTEMPTS} attempts; skipping");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!("random initialization placed {} of {n} particles", self.particles.len());
        } else {
            info!("initialized {} particles at random positions", self.particles.len());
        }
        Ok(self.particles.len())
    }

    /// Advance one step: Euler drift, wall pass, pair collision pass.
    pub fn step_euler(&mut self, dt: f64) -> Result<()> {
        self.step(Integrator::Euler, dt)
    }

    /// Advance one step: velocity-Verlet drift (no external field), wall pass, pair collision pass.
    pub fn step_verlet(&mut self, dt: f64) -> Result<()> {
        self.step(Integrator::Verlet, dt)
    }

    /// Advance one step with the selected integrator.
    ///
    /// Order is fixed: integrate every particle, reflect every particle off the
    /// walls (one wall collision counted per bounced particle), then resolve all
    /// pairwise contacts. On an empty box this does nothing.
    ///
    /// Disks lie within `[r, W-r] x [r, H-r]` after the wall pass; the overlap
    /// correction of the pair pass can move a disk next to a wall slightly past it.
    pub fn step(&mut self, integrator: Integrator, dt: f64) -> Result<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(Error::InvalidParam("dt must be finite and > 0".into()));
        }

        match integrator {
            Integrator::Euler => self.particles.iter_mut().for_each(|p| p.integrate_euler(dt)),
            Integrator::Verlet => self.particles.iter_mut().for_each(|p| p.integrate_verlet_free(dt)),
        }

        let (w, h) = (self.width, self.height);
        let bounced = self
            .particles
            .iter_mut()
            .map(|p| p.reflect_off_walls(w, h))
            .filter(|hit| hit.any())
            .count();
        self.wall_collisions += bounced as u64;

        self.detect_and_resolve_collisions();
        Ok(())
    }

    /// Exhaustive pairwise collision pass.
    ///
    /// Every unordered pair `(i, j)`, `i < j`, is tested and resolved once, in
    /// index order. With three or more bodies in simultaneous contact the outcome
    /// depends on that order. Returns the number of pairs that received an impulse.
    pub fn detect_and_resolve_collisions(&mut self) -> usize {
        let n = self.particles.len();
        let mut resolved = 0usize;
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = pair_mut(&mut self.particles, i, j);
                if a.has_collision(b) && a.resolve_collision(b) {
                    resolved += 1;
                }
            }
        }
        resolved
    }

    /// Compute total kinetic energy (diagnostic).
    pub fn total_kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Total linear momentum (diagnostic).
    pub fn total_momentum(&self) -> [f64; DIM] {
        self.particles.iter().fold([0.0; DIM], |mut acc, p| {
            let m = p.momentum();
            acc[0] += m[0];
            acc[1] += m[1];
            acc
        })
    }

    /// Drive a fixed-step run from `t = 0` until `t >= t_final`, writing snapshots to `sink`.
    ///
    /// A snapshot is written whenever `t` has reached the next output time
    /// (`dt_output` cadence, independent of `dt`), and once more at the end.
    pub fn run<W: Write>(
        &mut self,
        t_final: f64,
        dt: f64,
        dt_output: f64,
        sink: &mut Trajectory<W>,
        integrator: Integrator,
    ) -> Result<RunReport> {
        let never = AtomicBool::new(false);
        self.run_cancellable(t_final, dt, dt_output, sink, integrator, &never)
    }

    /// Like [`SimBox::run`], but checks `cancel` once per step.
    ///
    /// A cancelled run stops stepping, still writes its final snapshot and
    /// reports `cancelled = true`.
    pub fn run_cancellable<W: Write>(
        &mut self,
        t_final: f64,
        dt: f64,
        dt_output: f64,
        sink: &mut Trajectory<W>,
        integrator: Integrator,
        cancel: &AtomicBool,
    ) -> Result<RunReport> {
        if !t_final.is_finite() || t_final < 0.0 {
            return Err(Error::InvalidParam("t_final must be finite and >= 0".into()));
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(Error::InvalidParam("dt must be finite and > 0".into()));
        }
        if !dt_output.is_finite() || dt_output <= 0.0 {
            return Err(Error::InvalidParam("dt_output must be finite and > 0".into()));
        }

        debug!(
            "run: method={integrator}, t_final={t_final}, dt={dt}, dt_output={dt_output}, n={}",
            self.particles.len()
        );

        let initial_energy = self.total_kinetic_energy();
        let progress_every = ((t_final / (10.0 * dt)) as u64).max(1);
        let mut t = 0.0_f64;
        let mut next_output = 0.0_f64;
        let mut steps = 0u64;
        let mut snapshots = 0u64;
        let mut cancelled = false;

        while t < t_final {
            if cancel.load(Ordering::Relaxed) {
                info!("run cancelled at t = {t}");
                cancelled = true;
                break;
            }
            if t >= next_output {
                sink.write_snapshot(t, &self.particles)?;
                snapshots += 1;
                next_output += dt_output;
            }

            self.step(integrator, dt)?;
            t += dt;
            steps += 1;

            if steps % progress_every == 0 {
                info!("progress: {:.0}%", 100.0 * t / t_final);
            }
        }

        sink.write_snapshot(t, &self.particles)?;
        snapshots += 1;
        sink.flush()?;

        let report = RunReport {
            integrator,
            steps,
            snapshots,
            final_time: t,
            initial_energy,
            final_energy: self.total_kinetic_energy(),
            wall_collisions: self.wall_collisions,
            cancelled,
        };
        info!(
            "run finished: {} steps, {} wall collisions, final energy {}",
            report.steps, report.wall_collisions, report.final_energy
        );
        Ok(report)
    }

    fn validate_species(&self, mass: f64, radius: f64, v_max: f64) -> Result<()> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !v_max.is_finite() || v_max < 0.0 {
            return Err(Error::InvalidParam("v_max must be finite and >= 0".into()));
        }
        // Sampling spans [-v_max, v_max]; its width must stay finite
        if !(2.0 * v_max).is_finite() {
            return Err(Error::InvalidParam(format!("v_max {v_max} is too large to sample")));
        }
        if 2.0 * radius > self.width || 2.0 * radius > self.height {
            return Err(Error::InvalidParam(
                "box must be at least 2 * radius in every dimension".into(),
            ));
        }
        Ok(())
    }
}

// ============ Utility helpers ============

/// Borrow two distinct elements mutably. Requires `i < j`.
#[inline]
fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    assert!(i < j, "pair indices must satisfy i < j");
    let (head, tail) = particles.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}
