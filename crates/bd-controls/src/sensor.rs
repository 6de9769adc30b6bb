//! Read-only probes mirroring the process model.
//!
//! A sensor can only be written by refreshing it from a
//! [`MeasurementProvider`]. The controller receives sensors by shared
//! reference, so it can read them but never set them.

use bd_core::Real;
use serde::{Deserialize, Serialize};

/// Quantity a sensor probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    /// Temperature in °C.
    Temperature,
    /// pH, unitless.
    Ph,
}

/// Something that can be probed, implemented by the process model.
pub trait MeasurementProvider {
    fn measure(&self, measurement: Measurement) -> Real;
}

/// Last-known reading of one quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    measurement: Measurement,
    reading: Real,
}

impl Sensor {
    /// Create a sensor already holding the provider's current value.
    pub fn attach(measurement: Measurement, provider: &impl MeasurementProvider) -> Self {
        Self {
            measurement,
            reading: provider.measure(measurement),
        }
    }

    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    pub fn read(&self) -> Real {
        self.reading
    }

    /// Copy the provider's current value into the sensor.
    pub fn refresh(&mut self, provider: &impl MeasurementProvider) {
        self.reading = provider.measure(self.measurement);
    }
}

/// Temperature and pH probes of one digestor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensors {
    temperature: Sensor,
    ph: Sensor,
}

impl Sensors {
    pub fn attach(provider: &impl MeasurementProvider) -> Self {
        Self {
            temperature: Sensor::attach(Measurement::Temperature, provider),
            ph: Sensor::attach(Measurement::Ph, provider),
        }
    }

    pub fn temperature(&self) -> Real {
        self.temperature.read()
    }

    pub fn ph(&self) -> Real {
        self.ph.read()
    }

    pub fn refresh(&mut self, provider: &impl MeasurementProvider) {
        self.temperature.refresh(provider);
        self.ph.refresh(provider);
    }
}
