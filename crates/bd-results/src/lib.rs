//! bd-results: recorded time series, run summaries and their JSON form.

pub mod export;
pub mod format;
pub mod types;

pub use export::{load_run_output, read_run_output, save_run_output, write_run_output};
pub use format::{TIMESTAMP_FORMAT, format_elapsed, format_timestamp, parse_elapsed};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {what}: {value}")]
    InvalidFormat { what: &'static str, value: String },
}
