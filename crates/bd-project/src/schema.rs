//! Scenario schema definitions.

use bd_controls::ControllerConfig;
use bd_sim::{DigestorParams, EnvironmentConfig};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One simulation scenario as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub environment: EnvironmentDef,
    #[serde(default)]
    pub digestor: DigestorParams,
    #[serde(default)]
    pub controller: ControllerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentDef {
    pub time_step_min: i64,
    pub horizon_s: i64,
    pub initial_temperature_c: f64,
    pub initial_ph: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveDateTime>,
}

impl Default for Scenario {
    fn default() -> Self {
        let defaults = EnvironmentConfig::default();
        Self {
            version: crate::validate::LATEST_VERSION,
            name: "default".to_string(),
            environment: EnvironmentDef {
                time_step_min: defaults.time_step_min,
                horizon_s: defaults.horizon_s,
                initial_temperature_c: defaults.initial_temperature_c,
                initial_ph: defaults.initial_ph,
                start_time: None,
            },
            digestor: defaults.digestor,
            controller: defaults.controller,
        }
    }
}

impl Scenario {
    /// Runtime configuration for one environment built from this scenario.
    pub fn environment_config(&self) -> EnvironmentConfig {
        EnvironmentConfig {
            time_step_min: self.environment.time_step_min,
            horizon_s: self.environment.horizon_s,
            initial_temperature_c: self.environment.initial_temperature_c,
            initial_ph: self.environment.initial_ph,
            start_time: self.environment.start_time,
            digestor: self.digestor.clone(),
            controller: self.controller.clone(),
        }
    }
}
