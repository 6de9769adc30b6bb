//! Error types for the bd-app service layer.

use bd_core::EnvironmentId;

/// Unified error for every front end sitting on the service layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Environment not found: {0}")]
    EnvironmentNotFound(EnvironmentId),

    #[error("Environment is busy: {0}")]
    EnvironmentBusy(EnvironmentId),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Project error: {0}")]
    Project(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<bd_sim::SimError> for AppError {
    fn from(err: bd_sim::SimError) -> Self {
        match err {
            bd_sim::SimError::InvalidConfig { .. } | bd_sim::SimError::Control(_) => {
                AppError::InvalidConfig(err.to_string())
            }
            bd_sim::SimError::Fault { .. } => AppError::Simulation(err.to_string()),
        }
    }
}

impl From<bd_project::ProjectError> for AppError {
    fn from(err: bd_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<bd_results::ResultsError> for AppError {
    fn from(err: bd_results::ResultsError) -> Self {
        match err {
            bd_results::ResultsError::Io(e) => AppError::Io(e),
            bd_results::ResultsError::Json(e) => AppError::Json(e),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}
