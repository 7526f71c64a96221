use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors raised while building a particle system.
///
/// Ticking never fails; only construction is validated.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("a particle system needs at least one molecule")]
    EmptySystem,
}
