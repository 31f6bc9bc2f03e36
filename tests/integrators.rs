use gasbox::core::diagnostics::relative_energy_drift;
use gasbox::core::particle::SEPARATION_BIAS;
use gasbox::core::{Integrator, Particle, SimBox};
use gasbox::error::Result;

fn assert_confined(p: &Particle, w: f64, h: f64) {
    assert!(
        p.x() >= p.radius && p.x() <= w - p.radius,
        "x = {} escaped [{}, {}]",
        p.x(),
        p.radius,
        w - p.radius
    );
    assert!(
        p.y() >= p.radius && p.y() <= h - p.radius,
        "y = {} escaped [{}, {}]",
        p.y(),
        p.radius,
        h - p.radius
    );
}

/// Disks that never touch each other stay exactly inside `[r, W-r] x [r, H-r]`
/// after every step.
#[test]
fn wall_confinement_every_step() -> Result<()> {
    for integrator in [Integrator::Euler, Integrator::Verlet] {
        let mut sb = SimBox::new(5.0, 5.0, Some(31))?;
        // One disk per horizontal lane, lanes 1.0 apart: no pair contacts
        for (k, vx) in [3.0, -2.7, 1.3, -0.9, 2.2].into_iter().enumerate() {
            let y = 0.5 + k as f64;
            sb.push_particle(Particle::new(2.5, y, vx, 0.0, 1.0, 0.1)?);
        }
        let (w, h) = (sb.width(), sb.height());
        for _ in 0..2_000 {
            sb.step(integrator, 0.005)?;
            for p in sb.particles() {
                assert_confined(p, w, h);
            }
        }
        assert!(sb.wall_collisions() > 0);
    }
    Ok(())
}

/// The wall pass confines each disk; the pair pass that follows may push one
/// back out, but never by more than its half-overlap correction.
#[test]
fn dense_gas_wall_excursion_is_bounded() -> Result<()> {
    for integrator in [Integrator::Euler, Integrator::Verlet] {
        let mut sb = SimBox::new(5.0, 5.0, Some(31))?;
        sb.initialize_grid(50, 1.0, 0.1, 3.0)?;
        let (w, h) = (sb.width(), sb.height());
        for _ in 0..2_000 {
            sb.step(integrator, 0.005)?;
            for p in sb.particles() {
                let r = p.radius;
                let excursion = [r - p.x(), p.x() - (w - r), r - p.y(), p.y() - (h - r)]
                    .into_iter()
                    .fold(0.0f64, f64::max);
                assert!(
                    excursion <= r + SEPARATION_BIAS,
                    "({}, {}) left the box by {excursion}",
                    p.x(),
                    p.y()
                );
            }
        }
        assert!(sb.wall_collisions() > 0);
    }
    Ok(())
}

/// A disk overshooting a wall in one step is clamped to the contact position.
#[test]
fn overshoot_is_clamped_within_the_step() -> Result<()> {
    let mut sb = SimBox::new(4.0, 3.0, Some(6))?;
    sb.push_particle(Particle::new(3.85, 0.2, 2.0, -2.0, 1.0, 0.1)?);
    sb.step_euler(0.1)?;
    let p = &sb.particles()[0];
    assert_confined(p, 4.0, 3.0);
    assert_eq!(p.x(), 3.9);
    assert_eq!(p.y(), 0.1);
    assert_eq!(p.v, [-2.0, 2.0]);
    assert_eq!(sb.wall_collisions(), 1);
    Ok(())
}

/// A lone particle crossing a 10-wide box twice bounces exactly twice.
#[test]
fn wall_counter_single_particle() -> Result<()> {
    let mut sb = SimBox::new(10.0, 10.0, Some(8))?;
    sb.push_particle(Particle::new(5.0, 5.0, 1.0, 0.0, 1.0, 0.1)?);
    // Bounces near t = 4.9 and t = 14.7
    for _ in 0..2_000 {
        sb.step_verlet(0.01)?;
    }
    assert_eq!(sb.wall_collisions(), 2);
    assert_eq!(sb.particles()[0].vx(), 1.0);
    Ok(())
}

/// Elastic walls and pairs keep the total kinetic energy of a dense gas constant.
#[test]
fn dense_gas_conserves_energy() -> Result<()> {
    let mut sb = SimBox::new(10.0, 10.0, Some(123))?;
    sb.initialize_grid(100, 1.0, 0.15, 2.0)?;
    let e0 = sb.total_kinetic_energy();
    for _ in 0..1_000 {
        sb.step_verlet(0.001)?;
    }
    let drift = relative_energy_drift(e0, sb.total_kinetic_energy());
    assert!(drift < 1e-9, "relative energy drift {drift}");
    Ok(())
}

/// Same 50-particle grid, same seed: Verlet drifts no more than Euler.
#[test]
fn verlet_drift_not_worse_than_euler() -> Result<()> {
    let run = |integrator: Integrator| -> Result<f64> {
        let mut sb = SimBox::new(10.0, 10.0, Some(2025))?;
        sb.initialize_grid(50, 1.0, 0.1, 1.5)?;
        let e0 = sb.total_kinetic_energy();
        for _ in 0..1_000 {
            sb.step(integrator, 0.001)?;
        }
        Ok(relative_energy_drift(e0, sb.total_kinetic_energy()))
    };
    let euler = run(Integrator::Euler)?;
    let verlet = run(Integrator::Verlet)?;
    assert!(verlet <= euler + 1e-12, "verlet {verlet} vs euler {euler}");
    Ok(())
}

/// Without an external field, Euler and Verlet steps coincide.
#[test]
fn integrators_agree_without_field() -> Result<()> {
    let mut a = SimBox::new(10.0, 10.0, Some(77))?;
    let mut b = SimBox::new(10.0, 10.0, Some(77))?;
    a.initialize_grid(30, 1.0, 0.2, 1.0)?;
    b.initialize_grid(30, 1.0, 0.2, 1.0)?;
    for _ in 0..500 {
        a.step_euler(0.002)?;
        b.step_verlet(0.002)?;
    }
    assert_eq!(a.particles(), b.particles());
    assert_eq!(a.wall_collisions(), b.wall_collisions());
    Ok(())
}
