//! Binary actuators driven by the controller.
//!
//! Every device is on or off and counts its off→on edges. The agitator also
//! remembers when it last changed state (`delta_start`), which bounds both its
//! on-duration and its off-duration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which physical device an [`Actuator`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorKind {
    /// Heating pump.
    Pump,
    /// DC-motor agitator.
    Agitator,
    /// Acid dosing valve.
    AcidValve,
    /// Base dosing valve.
    BaseValve,
}

impl ActuatorKind {
    pub const ALL: [ActuatorKind; 4] = [
        ActuatorKind::Pump,
        ActuatorKind::Agitator,
        ActuatorKind::AcidValve,
        ActuatorKind::BaseValve,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActuatorKind::Pump => "pump",
            ActuatorKind::Agitator => "agitator",
            ActuatorKind::AcidValve => "acid_valve",
            ActuatorKind::BaseValve => "base_valve",
        }
    }
}

impl fmt::Display for ActuatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On/off device with an activation counter.
///
/// `activate` on an already-active device is a no-op, and the counter moves
/// only on an off→on edge.
///
/// ```
/// use bd_controls::{Actuator, ActuatorKind};
///
/// let mut pump = Actuator::new(ActuatorKind::Pump);
/// assert!(pump.activate());
/// assert!(!pump.activate());
/// pump.deactivate();
/// pump.activate();
/// assert_eq!(pump.activations(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actuator {
    kind: ActuatorKind,
    active: bool,
    activations: u32,
}

impl Actuator {
    pub fn new(kind: ActuatorKind) -> Self {
        Self {
            kind,
            active: false,
            activations: 0,
        }
    }

    pub fn kind(&self) -> ActuatorKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Switch on. Returns `true` if this was an off→on edge.
    pub fn activate(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.activations += 1;
        true
    }

    /// Switch off. Returns `true` if this was an on→off edge.
    pub fn deactivate(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        was_active
    }
}

/// Agitator: an actuator plus the time of its last state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agitator {
    motor: Actuator,
    delta_start_s: u64,
}

impl Default for Agitator {
    fn default() -> Self {
        Self::new()
    }
}

impl Agitator {
    pub fn new() -> Self {
        Self {
            motor: Actuator::new(ActuatorKind::Agitator),
            delta_start_s: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.motor.is_active()
    }

    pub fn activations(&self) -> u32 {
        self.motor.activations()
    }

    /// Elapsed seconds at which the agitator last started, was re-triggered,
    /// or stopped.
    pub fn delta_start_s(&self) -> u64 {
        self.delta_start_s
    }

    /// Seconds since `delta_start`.
    pub fn since_delta(&self, now_s: u64) -> u64 {
        now_s.saturating_sub(self.delta_start_s)
    }

    /// Start the motor, or restart its on-window if it is already running.
    ///
    /// Returns `true` on an off→on edge.
    pub fn trigger(&mut self, now_s: u64) -> bool {
        self.delta_start_s = now_s;
        self.motor.activate()
    }

    /// Stop the motor. The off-window starts only on a real on→off edge.
    pub fn stop(&mut self, now_s: u64) -> bool {
        let edge = self.motor.deactivate();
        if edge {
            self.delta_start_s = now_s;
        }
        edge
    }
}

/// A single actuator state change made by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorEvent {
    pub kind: ActuatorKind,
    pub active: bool,
    pub at_s: u64,
}

/// Boolean state of every actuator at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorStates {
    pub pump: bool,
    pub agitator: bool,
    pub acid_valve: bool,
    pub base_valve: bool,
}

/// Off→on edge counts of every actuator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationCounts {
    pub pump: u32,
    pub agitator: u32,
    pub acid_valve: u32,
    pub base_valve: u32,
}

impl ActivationCounts {
    pub fn get(&self, kind: ActuatorKind) -> u32 {
        match kind {
            ActuatorKind::Pump => self.pump,
            ActuatorKind::Agitator => self.agitator,
            ActuatorKind::AcidValve => self.acid_valve,
            ActuatorKind::BaseValve => self.base_valve,
        }
    }
}

/// The full actuator set owned by one environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actuators {
    pub pump: Actuator,
    pub acid_valve: Actuator,
    pub base_valve: Actuator,
    pub agitator: Agitator,
}

impl Default for Actuators {
    fn default() -> Self {
        Self {
            pump: Actuator::new(ActuatorKind::Pump),
            acid_valve: Actuator::new(ActuatorKind::AcidValve),
            base_valve: Actuator::new(ActuatorKind::BaseValve),
            agitator: Agitator::new(),
        }
    }
}

impl Actuators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> ActuatorStates {
        ActuatorStates {
            pump: self.pump.is_active(),
            agitator: self.agitator.is_active(),
            acid_valve: self.acid_valve.is_active(),
            base_valve: self.base_valve.is_active(),
        }
    }

    pub fn activation_counts(&self) -> ActivationCounts {
        ActivationCounts {
            pump: self.pump.activations(),
            agitator: self.agitator.activations(),
            acid_valve: self.acid_valve.activations(),
            base_valve: self.base_valve.activations(),
        }
    }
}
