//! bd-core: shared foundation for the biodigestor workspace.
//!
//! Contains:
//! - units (uom time types + minute/second conversions)
//! - numeric (Real + tolerances + float helpers)
//! - ids (opaque environment identifiers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use ids::EnvironmentId;
pub use numeric::*;
pub use units::*;
