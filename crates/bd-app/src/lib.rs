//! Shared application service layer for the biodigestor simulator.
//!
//! Owns the registry of live environments and the helpers a front end needs
//! to create, run, stop and inspect them.

pub mod error;
pub mod query;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use query::{
    RunStats, duty_fraction, extract_series, get_run_summary, list_variables, load_output,
    save_output,
};
pub use run_service::{EnvironmentInfo, RunWorker, SimulationService, StopOutcome};
