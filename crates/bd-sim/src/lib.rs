//! Closed-loop biodigestor simulation.
//!
//! Provides:
//! - the digestor process model (linear thermal gain/loss, pH dosing and drift)
//! - a fixed-step simulated clock
//! - the environment that owns every component and drives the tick loop
//! - a cloneable stop handle for stopping a run from another thread

pub mod clock;
pub mod digestor;
pub mod environment;
pub mod error;

pub use clock::SimClock;
pub use digestor::{BioDigestor, DigestorParams, ProcessModel};
pub use environment::{Environment, EnvironmentConfig, RunReport, RunStatus, StopHandle, StopReason};
pub use error::{SimError, SimResult};
