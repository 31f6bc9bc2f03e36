use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Time integrator used to advance particle motion between collision passes.
///
/// With no external field both schemes translate at constant velocity; they
/// differ in how they would treat an acceleration and in the energy drift
/// observed once wall and pair corrections are interleaved.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrator {
    /// Explicit forward Euler.
    #[serde(rename = "euler")]
    Euler,

    /// Velocity-Verlet. Symplectic; the default for production runs.
    #[default]
    #[serde(rename = "verlet")]
    Verlet,
}

impl Integrator {
    pub fn display_name(self) -> &'static str {
        match self {
            Integrator::Euler => "Euler",
            Integrator::Verlet => "Velocity-Verlet",
        }
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Integrator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" => Ok(Integrator::Euler),
            "verlet" | "velocity-verlet" => Ok(Integrator::Verlet),
            other => Err(Error::InvalidParam(format!(
                "unknown integrator '{other}', expected 'euler' or 'verlet'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names() -> Result<()> {
        assert_eq!("euler".parse::<Integrator>()?, Integrator::Euler);
        assert_eq!(" Verlet ".parse::<Integrator>()?, Integrator::Verlet);
        assert_eq!("velocity-verlet".parse::<Integrator>()?, Integrator::Verlet);
        assert!("rk4".parse::<Integrator>().is_err());
        Ok(())
    }

    #[test]
    fn default_is_verlet() {
        assert_eq!(Integrator::default(), Integrator::Verlet);
        assert_eq!(Integrator::Euler.to_string(), "Euler");
    }
}
