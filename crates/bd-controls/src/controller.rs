//! Threshold/timer policy of the digestor's micro-controller.
//!
//! Evaluated once per tick, always in this order:
//! 1. heating (pump) against the temperature band
//! 2. base dosing below the pH band
//! 3. acid dosing above the pH band
//! 4. routine agitation windows
//!
//! A valve opening always (re)triggers the agitator, and a valve closing
//! stops it. Because rules 2 and 3 run first and reset the agitator's
//! `delta_start`, a pH correction wins over the routine timer in the same tick.
//!
//! The policy only depends on the sensor readings, the actuator states and
//! the agitator timer, so evaluating it twice at the same instant changes
//! nothing the second time.

use crate::actuator::{ActuatorEvent, ActuatorKind, Actuators};
use crate::error::{ControlError, ControlResult};
use crate::sensor::Sensors;
use bd_core::{Real, ensure_finite, minutes_to_seconds};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Controller thresholds and agitation timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Pump switches on strictly below this temperature (°C).
    pub temperature_low_c: Real,
    /// Pump switches off at or above this temperature (°C).
    pub temperature_high_c: Real,
    /// Base valve opens strictly below this pH.
    pub ph_min: Real,
    /// Acid valve opens strictly above this pH.
    pub ph_max: Real,
    /// Longest routine agitation run (simulated minutes).
    pub agitation_duration_min: u32,
    /// Rest between routine agitation runs (simulated minutes).
    pub agitation_interval_min: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            temperature_low_c: 52.0,
            temperature_high_c: 58.0,
            ph_min: 6.8,
            ph_max: 7.4,
            agitation_duration_min: 15,
            agitation_interval_min: 240,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> ControlResult<()> {
        ensure_finite(self.temperature_low_c, "temperature_low_c")?;
        ensure_finite(self.temperature_high_c, "temperature_high_c")?;
        ensure_finite(self.ph_min, "ph_min")?;
        ensure_finite(self.ph_max, "ph_max")?;

        if self.temperature_low_c > self.temperature_high_c {
            return Err(ControlError::InvalidArg {
                what: "temperature_low_c must not exceed temperature_high_c",
            });
        }
        if self.ph_min >= self.ph_max {
            return Err(ControlError::InvalidArg {
                what: "ph_min must be less than ph_max",
            });
        }
        if self.agitation_duration_min == 0 {
            return Err(ControlError::InvalidArg {
                what: "agitation_duration_min must be positive",
            });
        }
        if self.agitation_interval_min == 0 {
            return Err(ControlError::InvalidArg {
                what: "agitation_interval_min must be positive",
            });
        }
        Ok(())
    }
}

/// Simulated ESP32 micro-controller.
#[derive(Debug, Clone, PartialEq)]
pub struct MicroController {
    config: ControllerConfig,
    agitation_duration_s: u64,
    agitation_interval_s: u64,
    last_temperature: Option<Real>,
    last_ph: Option<Real>,
    time_to_target_s: Option<u64>,
}

impl MicroController {
    /// Create a controller.
    ///
    /// # Errors
    ///
    /// Returns error if the bands are inverted or non-finite, or a timer is zero.
    pub fn new(config: ControllerConfig) -> ControlResult<Self> {
        config.validate()?;
        Ok(Self {
            agitation_duration_s: minutes_to_seconds(config.agitation_duration_min),
            agitation_interval_s: minutes_to_seconds(config.agitation_interval_min),
            config,
            last_temperature: None,
            last_ph: None,
            time_to_target_s: None,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Temperature consumed by the most recent update.
    pub fn last_temperature(&self) -> Option<Real> {
        self.last_temperature
    }

    /// pH consumed by the most recent update.
    pub fn last_ph(&self) -> Option<Real> {
        self.last_ph
    }

    /// Elapsed seconds at which the pump first switched off at the high
    /// threshold. Frozen after the first time.
    pub fn time_to_target_s(&self) -> Option<u64> {
        self.time_to_target_s
    }

    /// Run the policy once at elapsed time `now_s`.
    ///
    /// Returns the actuator edges produced, in rule order.
    pub fn update(
        &mut self,
        sensors: &Sensors,
        actuators: &mut Actuators,
        now_s: u64,
    ) -> Vec<ActuatorEvent> {
        let temperature = sensors.temperature();
        let ph = sensors.ph();
        self.last_temperature = Some(temperature);
        self.last_ph = Some(ph);

        let mut events = Vec::new();
        self.regulate_temperature(temperature, actuators, now_s, &mut events);
        self.dose_base(ph, actuators, now_s, &mut events);
        self.dose_acid(ph, actuators, now_s, &mut events);
        self.routine_agitation(actuators, now_s, &mut events);

        for event in &events {
            debug!(
                actuator = %event.kind,
                active = event.active,
                elapsed_s = event.at_s,
                "actuator edge"
            );
        }
        events
    }

    fn regulate_temperature(
        &mut self,
        temperature: Real,
        actuators: &mut Actuators,
        now_s: u64,
        events: &mut Vec<ActuatorEvent>,
    ) {
        let pump = &mut actuators.pump;
        if temperature < self.config.temperature_low_c && !pump.is_active() {
            pump.activate();
            events.push(edge(ActuatorKind::Pump, true, now_s));
        } else if temperature >= self.config.temperature_high_c && pump.is_active() {
            pump.deactivate();
            events.push(edge(ActuatorKind::Pump, false, now_s));
            if self.time_to_target_s.is_none() {
                debug!(elapsed_s = now_s, "target temperature reached");
                self.time_to_target_s = Some(now_s);
            }
        }
    }

    fn dose_base(
        &self,
        ph: Real,
        actuators: &mut Actuators,
        now_s: u64,
        events: &mut Vec<ActuatorEvent>,
    ) {
        if ph < self.config.ph_min {
            if actuators.base_valve.activate() {
                events.push(edge(ActuatorKind::BaseValve, true, now_s));
                start_agitator(actuators, now_s, events);
            }
        } else if actuators.base_valve.deactivate() {
            events.push(edge(ActuatorKind::BaseValve, false, now_s));
            stop_agitator(actuators, now_s, events);
        }
    }

    fn dose_acid(
        &self,
        ph: Real,
        actuators: &mut Actuators,
        now_s: u64,
        events: &mut Vec<ActuatorEvent>,
    ) {
        if ph > self.config.ph_max {
            if actuators.acid_valve.activate() {
                events.push(edge(ActuatorKind::AcidValve, true, now_s));
                start_agitator(actuators, now_s, events);
            }
        } else if actuators.acid_valve.deactivate() {
            events.push(edge(ActuatorKind::AcidValve, false, now_s));
            stop_agitator(actuators, now_s, events);
        }
    }

    fn routine_agitation(
        &self,
        actuators: &mut Actuators,
        now_s: u64,
        events: &mut Vec<ActuatorEvent>,
    ) {
        let since = actuators.agitator.since_delta(now_s);
        if !actuators.agitator.is_active() {
            if since >= self.agitation_interval_s {
                start_agitator(actuators, now_s, events);
            }
        } else if since >= self.agitation_duration_s {
            stop_agitator(actuators, now_s, events);
        }
    }
}

fn edge(kind: ActuatorKind, active: bool, at_s: u64) -> ActuatorEvent {
    ActuatorEvent { kind, active, at_s }
}

fn start_agitator(actuators: &mut Actuators, now_s: u64, events: &mut Vec<ActuatorEvent>) {
    if actuators.agitator.trigger(now_s) {
        events.push(edge(ActuatorKind::Agitator, true, now_s));
    }
}

fn stop_agitator(actuators: &mut Actuators, now_s: u64, events: &mut Vec<ActuatorEvent>) {
    if actuators.agitator.stop(now_s) {
        events.push(edge(ActuatorKind::Agitator, false, now_s));
    }
}
