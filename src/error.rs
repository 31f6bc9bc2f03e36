use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the box simulation and its I/O edges.
///
/// Physical edge cases (coincident centers, separating pairs, a particle that
/// could not be placed) are never errors; they resolve as no-ops or partial
/// results. Errors are reserved for caller contract violations and for sinks
/// or configuration files that cannot be used.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter (non-positive extent, mass, radius, dt, ...).
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// A scenario file parsed but describes an unusable run.
    #[error("invalid scenario: {0}")]
    Config(String),

    /// Scenario YAML could not be parsed.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Trajectory sink or scenario file I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
