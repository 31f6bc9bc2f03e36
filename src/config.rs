//! Scenario configuration loaded from YAML.
//!
//! A scenario consists of:
//!
//! - [`DomainConfig`]    – box extents
//! - [`ParticlesConfig`] – species and initial layout
//! - [`RunConfig`]       – integrator and time stepping
//! - [`ScenarioConfig`]  – top-level wrapper, plus an optional seed
//!
//! # YAML format
//!
//! ```yaml
//! domain:
//!   width: 10.0
//!   height: 10.0
//!
//! particles:
//!   count: 25
//!   mass: 1.0
//!   radius: 0.1
//!   v_max: 1.0
//!   layout: grid          # or "random"
//!
//! run:
//!   t_final: 10.0
//!   dt: 0.001
//!   dt_output: 0.05
//!   integrator: verlet    # or "euler"
//!
//! seed: 42                # optional; omit for a fresh seed per run
//! ```

use crate::core::{Integrator, SimBox};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Initial placement strategy.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    #[serde(rename = "grid")]
    Grid,

    #[serde(rename = "random")]
    Random,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DomainConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ParticlesConfig {
    pub count: usize,
    pub mass: f64,
    pub radius: f64,
    pub v_max: f64,
    #[serde(default)]
    pub layout: Layout,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub t_final: f64,
    pub dt: f64,
    pub dt_output: f64,
    #[serde(default)]
    pub integrator: Integrator,
}

/// Top-level scenario configuration.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub domain: DomainConfig,
    pub particles: ParticlesConfig,
    pub run: RunConfig,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: ScenarioConfig = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let cfg: ScenarioConfig = serde_yaml::from_reader(BufReader::new(file))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject scenarios that would fail or produce meaningless physics.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(Error::Config(format!("{name} must be finite and > 0, got {v}")))
            }
        };
        positive("domain.width", self.domain.width)?;
        positive("domain.height", self.domain.height)?;
        positive("particles.mass", self.particles.mass)?;
        positive("particles.radius", self.particles.radius)?;
        positive("run.dt", self.run.dt)?;
        positive("run.dt_output", self.run.dt_output)?;

        if !self.particles.v_max.is_finite() || self.particles.v_max < 0.0 {
            return Err(Error::Config("particles.v_max must be finite and >= 0".into()));
        }
        if !self.run.t_final.is_finite() || self.run.t_final < 0.0 {
            return Err(Error::Config("run.t_final must be finite and >= 0".into()));
        }
        let diameter = 2.0 * self.particles.radius;
        if diameter > self.domain.width || diameter > self.domain.height {
            return Err(Error::Config(
                "particle diameter does not fit in the domain".into(),
            ));
        }
        Ok(())
    }

    /// Construct the box and populate it according to `particles.layout`.
    pub fn build_box(&self) -> Result<SimBox> {
        let mut sb = SimBox::new(self.domain.width, self.domain.height, self.seed)?;
        let p = &self.particles;
        match p.layout {
            Layout::Grid => sb.initialize_grid(p.count, p.mass, p.radius, p.v_max)?,
            Layout::Random => sb.initialize_random(p.count, p.mass, p.radius, p.v_max)?,
        };
        Ok(sb)
    }
}
