//! Digestor process model.
//!
//! Per tick, five additive rules run in a fixed order, each keyed on the
//! actuator states the controller left behind on the previous tick:
//!
//! 1. acid valve open: pH drops by the dose step
//! 2. base valve open: pH rises by the dose step
//! 3. pump on: temperature rises by `heat_gain * step`
//! 4. pump off and above ambient: temperature falls by `heat_loss * step`,
//!    never below ambient
//! 5. base valve closed: pH drifts down by the acidification step
//!
//! Rules 1/2 and 5 can fire in the same tick. That layered drift plus
//! correction is what the numbers in a run depend on.

use crate::error::{SimError, SimResult};
use bd_controls::{ActuatorStates, Measurement, MeasurementProvider};
use bd_core::{Real, ensure_finite};
use serde::{Deserialize, Serialize};

/// A process that evolves under the actuators once per tick.
pub trait ProcessModel: MeasurementProvider {
    /// Apply one tick of `step_min` simulated minutes.
    fn step(&mut self, actuators: &ActuatorStates, step_min: u32) -> SimResult<()>;
}

/// Linear gain/loss coefficients of the digestor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestorParams {
    /// Temperature passive cooling settles at (°C).
    pub ambient_temperature_c: Real,
    /// Heating rate with the pump on (°C per minute).
    pub heat_gain_c_per_min: Real,
    /// Cooling rate with the pump off (°C per minute).
    pub heat_loss_c_per_min: Real,
    /// pH change per tick while a dosing valve is open.
    pub ph_dose_per_tick: Real,
    /// Passive pH drop per tick while the base valve is closed.
    pub acidification_per_tick: Real,
}

impl Default for DigestorParams {
    fn default() -> Self {
        Self {
            ambient_temperature_c: 20.0,
            heat_gain_c_per_min: 0.2,
            heat_loss_c_per_min: 0.05,
            ph_dose_per_tick: 0.2,
            acidification_per_tick: 0.1,
        }
    }
}

impl DigestorParams {
    pub fn validate(&self) -> SimResult<()> {
        ensure_finite(self.ambient_temperature_c, "ambient_temperature_c")?;
        for (value, what) in [
            (self.heat_gain_c_per_min, "heat_gain_c_per_min"),
            (self.heat_loss_c_per_min, "heat_loss_c_per_min"),
            (self.ph_dose_per_tick, "ph_dose_per_tick"),
            (self.acidification_per_tick, "acidification_per_tick"),
        ] {
            ensure_finite(value, what)?;
            if value < 0.0 {
                return Err(SimError::InvalidConfig { what });
            }
        }
        Ok(())
    }
}

/// Temperature and pH state of the digestor.
#[derive(Debug, Clone, PartialEq)]
pub struct BioDigestor {
    params: DigestorParams,
    temperature_c: Real,
    ph: Real,
}

impl BioDigestor {
    /// # Errors
    ///
    /// Returns error if a starting value or coefficient is non-finite, or a
    /// rate is negative.
    pub fn new(params: DigestorParams, temperature_c: Real, ph: Real) -> SimResult<Self> {
        params.validate()?;
        ensure_finite(temperature_c, "initial temperature")?;
        ensure_finite(ph, "initial pH")?;
        Ok(Self {
            params,
            temperature_c,
            ph,
        })
    }

    pub fn params(&self) -> &DigestorParams {
        &self.params
    }

    pub fn temperature_c(&self) -> Real {
        self.temperature_c
    }

    pub fn ph(&self) -> Real {
        self.ph
    }
}

impl MeasurementProvider for BioDigestor {
    fn measure(&self, measurement: Measurement) -> Real {
        match measurement {
            Measurement::Temperature => self.temperature_c,
            Measurement::Ph => self.ph,
        }
    }
}

impl ProcessModel for BioDigestor {
    fn step(&mut self, actuators: &ActuatorStates, step_min: u32) -> SimResult<()> {
        let minutes = Real::from(step_min);
        let p = &self.params;

        if actuators.acid_valve {
            self.ph -= p.ph_dose_per_tick;
        }
        if actuators.base_valve {
            self.ph += p.ph_dose_per_tick;
        }
        if actuators.pump {
            self.temperature_c += p.heat_gain_c_per_min * minutes;
        } else if self.temperature_c > p.ambient_temperature_c {
            self.temperature_c = (self.temperature_c - p.heat_loss_c_per_min * minutes)
                .max(p.ambient_temperature_c);
        }
        if !actuators.base_valve {
            self.ph -= p.acidification_per_tick;
        }

        if !self.temperature_c.is_finite() || !self.ph.is_finite() {
            return Err(SimError::Fault {
                what: format!(
                    "non-finite digestor state (temperature={}, pH={})",
                    self.temperature_c, self.ph
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digestor(temperature_c: Real, ph: Real) -> BioDigestor {
        BioDigestor::new(DigestorParams::default(), temperature_c, ph).unwrap()
    }

    fn states(pump: bool, acid_valve: bool, base_valve: bool) -> ActuatorStates {
        ActuatorStates {
            pump,
            agitator: false,
            acid_valve,
            base_valve,
        }
    }

    #[test]
    fn pump_heats_proportionally_to_step() {
        let mut d = digestor(20.0, 7.0);
        d.step(&states(true, false, false), 5).unwrap();
        assert!((d.temperature_c() - 21.0).abs() < 1e-12);

        d.step(&states(true, false, false), 10).unwrap();
        assert!((d.temperature_c() - 23.0).abs() < 1e-12);
    }

    #[test]
    fn idle_pump_cools_to_ambient_not_below() {
        let mut d = digestor(20.1, 7.0);
        d.step(&states(false, false, false), 5).unwrap();
        assert_eq!(d.temperature_c(), 20.0);

        d.step(&states(false, false, false), 5).unwrap();
        assert_eq!(d.temperature_c(), 20.0);
    }

    #[test]
    fn idle_pump_below_ambient_stays_put() {
        let mut d = digestor(15.0, 7.0);
        d.step(&states(false, false, false), 5).unwrap();
        assert_eq!(d.temperature_c(), 15.0);
    }

    #[test]
    fn cooling_rate_scales_with_step() {
        let mut d = digestor(50.0, 7.0);
        d.step(&states(false, false, false), 10).unwrap();
        assert!((d.temperature_c() - 49.5).abs() < 1e-12);
    }

    #[test]
    fn acid_dose_and_drift_stack() {
        let mut d = digestor(40.0, 8.0);
        d.step(&states(false, true, false), 5).unwrap();
        assert!((d.ph() - 7.7).abs() < 1e-12);
    }

    #[test]
    fn base_dose_suppresses_drift() {
        let mut d = digestor(40.0, 6.0);
        d.step(&states(false, false, true), 5).unwrap();
        assert!((d.ph() - 6.2).abs() < 1e-12);
    }

    #[test]
    fn passive_acidification_alone() {
        let mut d = digestor(40.0, 7.0);
        d.step(&states(false, false, false), 5).unwrap();
        assert!((d.ph() - 6.9).abs() < 1e-12);
    }

    #[test]
    fn provider_mirrors_state() {
        let d = digestor(33.0, 6.6);
        assert_eq!(d.measure(Measurement::Temperature), 33.0);
        assert_eq!(d.measure(Measurement::Ph), 6.6);
    }

    #[test]
    fn invalid_params_rejected() {
        let negative = DigestorParams {
            heat_loss_c_per_min: -0.1,
            ..DigestorParams::default()
        };
        assert!(BioDigestor::new(negative, 20.0, 7.0).is_err());
        assert!(BioDigestor::new(DigestorParams::default(), Real::NAN, 7.0).is_err());
        assert!(BioDigestor::new(DigestorParams::default(), 20.0, Real::INFINITY).is_err());
    }

    #[test]
    fn overflow_surfaces_as_fault() {
        let params = DigestorParams {
            heat_gain_c_per_min: Real::MAX,
            ..DigestorParams::default()
        };
        let mut d = BioDigestor::new(params, 20.0, 7.0).unwrap();
        let err = d.step(&states(true, false, false), 5).unwrap_err();
        assert!(matches!(err, SimError::Fault { .. }));
    }
}
