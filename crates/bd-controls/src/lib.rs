//! Actuators, sensors and the threshold/timer controller for the biodigestor.
//!
//! The control side is separate from the process model. Each tick the
//! environment refreshes the sensors from the digestor, then hands the
//! sensors (read-only) and the actuators (mutable) to the [`MicroController`].
//!
//! # Architecture
//!
//! - Actuators are binary devices with an activation counter
//! - The agitator additionally carries a timer for its on/off windows
//! - Sensors mirror a [`MeasurementProvider`] and cannot be written by the controller
//! - The controller is a fixed-order threshold policy evaluated once per tick

pub mod actuator;
pub mod controller;
pub mod error;
pub mod sensor;

pub use actuator::{
    ActivationCounts, Actuator, ActuatorEvent, ActuatorKind, ActuatorStates, Actuators, Agitator,
};
pub use controller::{ControllerConfig, MicroController};
pub use error::{ControlError, ControlResult};
pub use sensor::{Measurement, MeasurementProvider, Sensor, Sensors};
