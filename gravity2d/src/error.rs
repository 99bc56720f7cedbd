use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Configuration faults, detected before any step runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("particle {index} has invalid mass {mass}, mass must be finite and positive")]
    InvalidMass { index: usize, mass: f64 },
    #[error("particle {index} has invalid radius {radius}, radius must be finite and positive")]
    InvalidRadius { index: usize, radius: f64 },
    #[error("particle {index} has a non-finite position or velocity")]
    NonFiniteState { index: usize },
    #[error("particle {index} is stuck with {partner}, which is not a mutual active partner")]
    InvalidStuckRelation { index: usize, partner: usize },
    #[error("invalid range for {what}: [{min}, {max}]")]
    InvalidRange {
        what: &'static str,
        min: f64,
        max: f64,
    },
    #[error("a ring layout needs room for its anchor, capacity must be at least 1")]
    NoRoomForAnchor,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
