//! Result data types.

use bd_controls::{ActivationCounts, ActuatorStates};
use serde::{Deserialize, Serialize};

/// One recorded tick. Immutable once appended to a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Display timestamp, `start + elapsed`.
    pub time: String,
    /// `"<d> d <h> h <m> m <s> s"`.
    pub elapsed_time: String,
    pub temperature: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub pump: bool,
    pub acid_valve: bool,
    pub base_valve: bool,
    pub agitator: bool,
}

impl StateSnapshot {
    pub fn actuator_states(&self) -> ActuatorStates {
        ActuatorStates {
            pump: self.pump,
            agitator: self.agitator,
            acid_valve: self.acid_valve,
            base_valve: self.base_valve,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub activations: ActivationCounts,
    /// Elapsed seconds at which the heating first reached the high threshold.
    pub time_to_target_temperature: Option<u64>,
}

/// Everything a finished run hands back to its caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub time_series: Vec<StateSnapshot>,
    pub summary: RunSummary,
}
