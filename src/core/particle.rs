use crate::error::{Error, Result};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// Centers closer than this have no usable contact normal.
pub const DEGENERATE_DISTANCE: f64 = 1e-10;

/// Extra separation added on top of half the overlap when pushing a pair apart.
pub const SEPARATION_BIAS: f64 = 1e-6;

/// A rigid disk in D=2.
///
/// Fields:
/// - `r`: position vector [x, y]
/// - `v`: velocity vector [vx, vy]
/// - `radius`: disk radius (> 0)
/// - `mass`: particle mass (> 0)
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position (x, y).
    pub r: [f64; DIM],
    /// Velocity (vx, vy).
    pub v: [f64; DIM],
    /// Disk radius (> 0).
    pub radius: f64,
    /// Mass (> 0).
    pub mass: f64,
}

/// Which axes a call to [`Particle::reflect_off_walls`] bounced on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHit {
    pub x: bool,
    pub y: bool,
}

impl WallHit {
    /// True if the particle bounced on at least one axis.
    #[inline]
    pub fn any(self) -> bool {
        self.x || self.y
    }
}

impl Default for Particle {
    /// Placeholder state: at rest at the origin, unit mass, radius 0.1.
    fn default() -> Self {
        Self {
            r: [0.0; DIM],
            v: [0.0; DIM],
            radius: 0.1,
            mass: 1.0,
        }
    }
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` or `mass` is non-positive or any component is NaN/inf.
    pub fn new(x: f64, y: f64, vx: f64, vy: f64, mass: f64, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !(x.is_finite() && y.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !(vx.is_finite() && vy.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            r: [x, y],
            v: [vx, vy],
            radius,
            mass,
        })
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.r[0]
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.r[1]
    }

    #[inline]
    pub fn vx(&self) -> f64 {
        self.v[0]
    }

    #[inline]
    pub fn vy(&self) -> f64 {
        self.v[1]
    }

    /// Explicit Euler drift: `r += v dt`. Velocity is untouched.
    #[inline]
    pub fn integrate_euler(&mut self, dt: f64) {
        for (rk, &vk) in self.r.iter_mut().zip(self.v.iter()) {
            *rk += vk * dt;
        }
    }

    /// Velocity-Verlet update under a constant acceleration `(ax, ay)`.
    ///
    /// Position first: `r += v dt + a dt^2 / 2`, then velocity: `v += a dt`.
    pub fn integrate_verlet(&mut self, dt: f64, ax: f64, ay: f64) {
        let a = [ax, ay];
        for k in 0..DIM {
            self.r[k] += self.v[k] * dt + 0.5 * a[k] * dt * dt;
            self.v[k] += a[k] * dt;
        }
    }

    /// Verlet update with no external field; reduces to constant-velocity translation.
    #[inline]
    pub fn integrate_verlet_free(&mut self, dt: f64) {
        self.integrate_verlet(dt, 0.0, 0.0);
    }

    /// Specular reflection off the walls of a `[0, width] x [0, height]` box.
    ///
    /// Each axis is handled independently: when the disk's edge crosses a wall the
    /// center is clamped to the contact position and that velocity component is
    /// negated. Both axes may bounce in the same call.
    pub fn reflect_off_walls(&mut self, width: f64, height: f64) -> WallHit {
        let extents = [width, height];
        let mut hit = [false; DIM];
        for k in 0..DIM {
            if self.r[k] - self.radius < 0.0 {
                self.r[k] = self.radius;
                self.v[k] = -self.v[k];
                hit[k] = true;
            }
            if self.r[k] + self.radius > extents[k] {
                self.r[k] = extents[k] - self.radius;
                self.v[k] = -self.v[k];
                hit[k] = true;
            }
        }
        WallHit {
            x: hit[0],
            y: hit[1],
        }
    }

    /// Center distance to `other`.
    #[inline]
    pub fn distance_to(&self, other: &Particle) -> f64 {
        let d = sub(&self.r, &other.r);
        dot(&d, &d).sqrt()
    }

    /// True iff the disks interpenetrate. Exact tangency is not a collision.
    #[inline]
    pub fn has_collision(&self, other: &Particle) -> bool {
        self.distance_to(other) < self.radius + other.radius
    }

    /// Resolve an elastic disk-disk collision, mutating both particles.
    ///
    /// Returns `true` if an impulse was applied. The call is a no-op when the
    /// disks do not overlap, when their centers (nearly) coincide, or when they
    /// are already separating along the contact normal.
    pub fn resolve_collision(&mut self, other: &mut Particle) -> bool {
        if !self.has_collision(other) {
            return false;
        }

        // Unit normal from self -> other
        let mut n = sub(&other.r, &self.r);
        let dist = dot(&n, &n).sqrt();
        if dist < DEGENERATE_DISTANCE {
            return false;
        }
        for nk in &mut n {
            *nk /= dist;
        }

        let u = sub(&other.v, &self.v);
        let dvn = dot(&u, &n);
        if dvn > 0.0 {
            return false;
        }

        // Only the normal component changes
        let (m1, m2) = (self.mass, other.mass);
        let f1 = 2.0 * m2 * dvn / (m1 + m2);
        let f2 = 2.0 * m1 * dvn / (m1 + m2);
        for (k, &nk) in n.iter().enumerate() {
            self.v[k] += f1 * nk;
            other.v[k] -= f2 * nk;
        }

        let overlap = self.radius + other.radius - dist;
        if overlap > 0.0 {
            let push = 0.5 * overlap + SEPARATION_BIAS;
            for (k, &nk) in n.iter().enumerate() {
                self.r[k] -= push * nk;
                other.r[k] += push * nk;
            }
        }
        true
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * dot(&self.v, &self.v)
    }

    /// Speed |v|.
    #[inline]
    pub fn speed(&self) -> f64 {
        dot(&self.v, &self.v).sqrt()
    }

    /// Linear momentum m v.
    #[inline]
    pub fn momentum(&self) -> [f64; DIM] {
        [self.mass * self.v[0], self.mass * self.v[1]]
    }
}

#[inline]
fn dot(a: &[f64; DIM], b: &[f64; DIM]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
fn sub(a: &[f64; DIM], b: &[f64; DIM]) -> [f64; DIM] {
    [a[0] - b[0], a[1] - b[1]]
}
