//! Error types for the simulation.
//!
//! Only conditions the caller has to act on are errors. Empty role pools and
//! missing targets are handled inside the simulation.

use thiserror::Error;

/// Main error type for simulation operations.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// A configuration value is missing or out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A tick was requested with a negative or non-finite elapsed time.
    #[error("invalid timestep: {0}")]
    InvalidTimestep(f32),

    /// The k-d tree could not be built or queried.
    #[error("spatial index error: {0}")]
    Spatial(String),

    /// File system errors
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;

impl SimulationError {
    /// Creates a new invalid parameter error.
    #[must_use]
    pub fn invalid<S: Into<String>>(name: &'static str, reason: S) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl From<kdtree::ErrorKind> for SimulationError {
    fn from(err: kdtree::ErrorKind) -> Self {
        Self::Spatial(format!("{err:?}"))
    }
}
