use gasbox::config::ScenarioConfig;
use gasbox::core::{Integrator, SimBox};
use gasbox::error::{Error, Result};
use gasbox::output::Trajectory;
use std::sync::atomic::AtomicBool;

fn parse_lines(bytes: Vec<u8>) -> Vec<Vec<f64>> {
    let text = String::from_utf8(bytes).expect("trajectory is utf-8");
    text.lines()
        .filter(|l| !l.starts_with('#'))
        .map(|l| {
            l.split_whitespace()
                .map(|v| v.parse::<f64>().expect("numeric column"))
                .collect()
        })
        .collect()
}

/// Snapshots follow the output cadence, carry 1 + 4N columns and end with a final one.
#[test]
fn run_writes_header_and_snapshots() -> Result<()> {
    let mut sb = SimBox::new(10.0, 10.0, Some(17))?;
    sb.initialize_grid(9, 1.0, 0.1, 1.0)?;

    let mut traj = Trajectory::new(Vec::new());
    let report = sb.run(1.0, 0.01, 0.1, &mut traj, Integrator::Verlet)?;
    assert!(!report.cancelled);
    assert!((99..=101).contains(&report.steps), "steps = {}", report.steps);
    assert!(report.final_time >= 1.0);

    let bytes = traj.into_inner()?;
    let header = String::from_utf8_lossy(&bytes)
        .lines()
        .next()
        .map(str::to_owned)
        .unwrap_or_default();
    assert!(header.starts_with("# t x0 y0 vx0 vy0 x1"));
    assert!(header.ends_with("x8 y8 vx8 vy8"));

    let rows = parse_lines(bytes);
    assert_eq!(rows.len() as u64, report.snapshots);
    assert!((11..=13).contains(&rows.len()), "rows = {}", rows.len());
    for row in &rows {
        assert_eq!(row.len(), 1 + 4 * 9);
    }
    assert_eq!(rows[0][0], 0.0);
    for pair in rows.windows(2) {
        assert!(pair[1][0] > pair[0][0], "snapshot times must increase");
    }
    let last = rows.last().expect("final snapshot");
    assert_eq!(last[0], report.final_time);

    // The final snapshot reflects the final state of the box
    let p0 = &sb.particles()[0];
    assert_eq!(&last[1..5], &[p0.x(), p0.y(), p0.vx(), p0.vy()]);
    Ok(())
}

#[test]
fn zero_length_run_writes_single_snapshot() -> Result<()> {
    let mut sb = SimBox::new(10.0, 10.0, Some(2))?;
    sb.initialize_grid(4, 1.0, 0.1, 1.0)?;
    let mut traj = Trajectory::new(Vec::new());
    let report = sb.run(0.0, 0.01, 0.1, &mut traj, Integrator::Euler)?;
    assert_eq!(report.steps, 0);
    assert_eq!(report.snapshots, 1);
    assert_eq!(parse_lines(traj.into_inner()?).len(), 1);
    Ok(())
}

#[test]
fn run_rejects_bad_parameters() -> Result<()> {
    let mut sb = SimBox::new(10.0, 10.0, Some(2))?;
    let mut traj = Trajectory::new(Vec::new());
    assert!(sb.run(1.0, 0.0, 0.1, &mut traj, Integrator::Verlet).is_err());
    assert!(sb.run(1.0, 0.01, -0.1, &mut traj, Integrator::Verlet).is_err());
    assert!(sb.run(f64::INFINITY, 0.01, 0.1, &mut traj, Integrator::Verlet).is_err());
    assert_eq!(traj.snapshots_written(), 0);
    Ok(())
}

/// A raised cancel flag stops stepping but still records the final state.
#[test]
fn cancelled_run_stops_early() -> Result<()> {
    let mut sb = SimBox::new(10.0, 10.0, Some(3))?;
    sb.initialize_grid(4, 1.0, 0.1, 1.0)?;
    let cancel = AtomicBool::new(true);
    let mut traj = Trajectory::new(Vec::new());
    let report = sb.run_cancellable(5.0, 0.01, 0.1, &mut traj, Integrator::Verlet, &cancel)?;
    assert!(report.cancelled);
    assert_eq!(report.steps, 0);
    assert_eq!(report.snapshots, 1);
    Ok(())
}

/// An output path in a missing directory is reported as an I/O error.
#[test]
fn unavailable_sink_is_reported() {
    let path = std::env::temp_dir()
        .join("gasbox-no-such-dir-7f3a")
        .join("out.dat");
    match Trajectory::create(&path) {
        Err(Error::Io(_)) => {}
        Err(e) => panic!("expected an I/O error, got {e}"),
        Ok(_) => panic!("creating {} should fail", path.display()),
    }
}

/// Scenario file -> box -> trajectory file on disk.
#[test]
fn scenario_run_to_file() -> Result<()> {
    let cfg = ScenarioConfig::from_yaml_str(
        r#"
domain: { width: 10.0, height: 10.0 }
particles: { count: 16, mass: 1.0, radius: 0.1, v_max: 1.5, layout: random }
run: { t_final: 0.5, dt: 0.001, dt_output: 0.05, integrator: euler }
seed: 99
"#,
    )?;
    let mut sb = cfg.build_box()?;
    assert_eq!(sb.num_particles(), 16);

    let path = std::env::temp_dir().join(format!("gasbox-trajectory-{}.dat", std::process::id()));
    let mut traj = Trajectory::create(&path)?;
    let run = &cfg.run;
    let report = sb.run(run.t_final, run.dt, run.dt_output, &mut traj, run.integrator)?;
    drop(traj);

    let bytes = std::fs::read(&path)?;
    std::fs::remove_file(&path)?;
    let rows = parse_lines(bytes);
    assert_eq!(rows.len() as u64, report.snapshots);
    assert!(rows.iter().all(|r| r.len() == 1 + 4 * 16));
    assert!(report.relative_energy_drift() < 1e-9);
    Ok(())
}
