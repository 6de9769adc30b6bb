//! Scenario validation logic.

use crate::schema::Scenario;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid {section} section: {reason}")]
    InvalidSection {
        section: &'static str,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if scenario.name.trim().is_empty() {
        return Err(invalid("name", &scenario.name, "must not be empty"));
    }

    let env = &scenario.environment;
    if env.time_step_min <= 0 {
        return Err(invalid(
            "environment.time_step_min",
            env.time_step_min,
            "must be positive",
        ));
    }
    if u32::try_from(env.time_step_min).is_err() {
        return Err(invalid(
            "environment.time_step_min",
            env.time_step_min,
            "too large",
        ));
    }
    if env.horizon_s <= 0 {
        return Err(invalid(
            "environment.horizon_s",
            env.horizon_s,
            "must be positive",
        ));
    }
    if !env.initial_temperature_c.is_finite() {
        return Err(invalid(
            "environment.initial_temperature_c",
            env.initial_temperature_c,
            "must be finite",
        ));
    }
    if !env.initial_ph.is_finite() {
        return Err(invalid(
            "environment.initial_ph",
            env.initial_ph,
            "must be finite",
        ));
    }

    scenario
        .digestor
        .validate()
        .map_err(|e| ValidationError::InvalidSection {
            section: "digestor",
            reason: e.to_string(),
        })?;
    scenario
        .controller
        .validate()
        .map_err(|e| ValidationError::InvalidSection {
            section: "controller",
            reason: e.to_string(),
        })?;

    Ok(())
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
