//! Error types for the accretion simulation.
//!
//! The physics step itself cannot fail. Errors come from invalid parameters
//! at construction time and from loading parameter files.

use std::fmt;

/// Errors that can occur when building a simulation.
#[derive(Debug)]
pub enum SimulationError {
    /// A parameter is outside its valid range.
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
    /// Failed to read a parameter file from disk.
    Io(std::io::Error),
    /// Failed to parse a parameter file.
    Parse(serde_json::Error),
}

impl SimulationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidConfig { field, reason } => {
                write!(f, "Invalid configuration for `{}`: {}", field, reason)
            }
            SimulationError::Io(e) => write!(f, "Failed to read parameter file: {}", e),
            SimulationError::Parse(e) => write!(f, "Failed to parse parameter file: {}", e),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Io(e) => Some(e),
            SimulationError::Parse(e) => Some(e),
            SimulationError::InvalidConfig { .. } => None,
        }
    }
}

impl From<std::io::Error> for SimulationError {
    fn from(e: std::io::Error) -> Self {
        SimulationError::Io(e)
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(e: serde_json::Error) -> Self {
        SimulationError::Parse(e)
    }
}
