//! Error types for Flare.

use thiserror::Error;

/// Top-level error type for Flare operations.
#[derive(Debug, Error)]
pub enum FlareError {
    /// Invalid construction-time configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Particle buffer errors
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    /// Config file could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Construction-time configuration errors.
///
/// These are fatal to the object being built. Nothing in the simulation
/// loop produces them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Emitter built without an emission profile
    #[error("emitter has no emission profile")]
    MissingProfile,

    /// Particle lifetime must be strictly positive
    #[error("particle term must be positive, got {0}")]
    NonPositiveTerm(f32),

    /// Modifier update frequency must be strictly positive
    #[error("modifier frequency must be positive, got {0}")]
    NonPositiveFrequency(f32),

    /// Reclaim frequency must be strictly positive
    #[error("reclaim frequency must be positive, got {0}")]
    NonPositiveReclaimFrequency(f32),

    /// Random seeds must be greater than zero
    #[error("seed must be greater than zero, got {0}")]
    InvalidSeed(i64),

    /// Buffers need room for at least one particle
    #[error("particle capacity must be greater than zero")]
    ZeroCapacity,

    /// A `{min, max}` range with `min > max`
    #[error("range `{field}` is inverted: min {min} > max {max}")]
    InvertedRange {
        /// Name of the offending parameter
        field: &'static str,
        /// Lower bound found
        min: f64,
        /// Upper bound found
        max: f64,
    },
}

/// Particle buffer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Copy destination cannot hold the live range
    #[error("destination holds {provided} particles but {required} are live")]
    DestinationTooSmall {
        /// Particles that needed copying
        required: usize,
        /// Capacity of the destination, in particles
        provided: usize,
    },
}

/// Result type alias for Flare operations.
pub type FlareResult<T> = Result<T, FlareError>;
