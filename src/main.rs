use gasbox::config::ScenarioConfig;
use gasbox::core::diagnostics::{effective_temperature, wall_collision_rate, SpeedStats};
use gasbox::output::Trajectory;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::path::PathBuf;

/// Run a hard-disk gas scenario and write its trajectory.
#[derive(Parser, Debug)]
struct Args {
    /// Scenario YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Trajectory output file
    #[arg(short, long, default_value = "trajectory.dat")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = ScenarioConfig::from_path(&args.config)
        .with_context(|| format!("failed to load scenario {}", args.config.display()))?;

    // Open the sink before doing any work so a bad path aborts cleanly
    let mut traj = Trajectory::create(&args.output)
        .with_context(|| format!("cannot open output {}", args.output.display()))?;

    let mut sb = cfg.build_box()?;
    let run = &cfg.run;
    info!(
        "{} particles, method {}, t_final {}, dt {}",
        sb.num_particles(),
        run.integrator,
        run.t_final,
        run.dt
    );

    let report = sb.run(run.t_final, run.dt, run.dt_output, &mut traj, run.integrator)?;

    println!("steps:            {}", report.steps);
    println!("snapshots:        {}", report.snapshots);
    println!("wall collisions:  {}", report.wall_collisions);
    if report.final_time > 0.0 {
        println!(
            "wall hit rate:    {:.4} /s",
            wall_collision_rate(report.wall_collisions, report.final_time)?
        );
    }
    println!("energy initial:   {}", report.initial_energy);
    println!("energy final:     {}", report.final_energy);
    println!("energy drift:     {:.3e}", report.relative_energy_drift());
    println!("temperature:      {:.4}", effective_temperature(sb.particles()));
    if let Some(stats) = SpeedStats::from_particles(sb.particles()) {
        println!(
            "speed mean/std/max: {:.4} / {:.4} / {:.4}",
            stats.mean, stats.std_dev, stats.max
        );
    }
    Ok(())
}
