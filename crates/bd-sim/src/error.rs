//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or running an environment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: &'static str },

    /// Internal inconsistency during a tick. The run is aborted.
    #[error("Simulation fault: {what}")]
    Fault { what: String },

    #[error("Controller error: {0}")]
    Control(#[from] bd_controls::ControlError),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<bd_core::CoreError> for SimError {
    fn from(e: bd_core::CoreError) -> Self {
        match e {
            bd_core::CoreError::NonFinite { what, .. } | bd_core::CoreError::InvalidArg { what } => {
                SimError::InvalidConfig { what }
            }
            bd_core::CoreError::Invariant { what } => SimError::Fault {
                what: what.to_string(),
            },
        }
    }
}
