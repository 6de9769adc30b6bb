//! Error types for control system operations.

use thiserror::Error;

/// Result type for control system operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control system operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<bd_core::CoreError> for ControlError {
    fn from(e: bd_core::CoreError) -> Self {
        match e {
            bd_core::CoreError::NonFinite { what, .. }
            | bd_core::CoreError::InvalidArg { what }
            | bd_core::CoreError::Invariant { what } => ControlError::InvalidArg { what },
        }
    }
}
