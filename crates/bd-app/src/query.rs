//! Query helpers for extracting data from run outputs.

use std::path::Path;

use bd_controls::{ActivationCounts, ActuatorKind, ActuatorStates};
use bd_results::{RunOutput, StateSnapshot, load_run_output, parse_elapsed, save_run_output};

use crate::error::{AppError, AppResult};

/// Variables [`extract_series`] understands.
const VARIABLES: [&str; 6] = [
    "temperature",
    "ph",
    "pump",
    "acid_valve",
    "base_valve",
    "agitator",
];

/// Summary of a run's time range and value ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub tick_count: usize,
    pub elapsed_range: (u64, u64),
    pub temperature_range: (f64, f64),
    pub ph_range: (f64, f64),
    pub activations: ActivationCounts,
    pub time_to_target_temperature: Option<u64>,
}

/// Get run summary from a run output.
pub fn get_run_summary(output: &RunOutput) -> AppResult<RunStats> {
    let series = &output.time_series;
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(AppError::InvalidInput("No snapshots in run".to_string()));
    };

    let mut temperature_range = (f64::INFINITY, f64::NEG_INFINITY);
    let mut ph_range = (f64::INFINITY, f64::NEG_INFINITY);
    for snapshot in series {
        temperature_range.0 = temperature_range.0.min(snapshot.temperature);
        temperature_range.1 = temperature_range.1.max(snapshot.temperature);
        ph_range.0 = ph_range.0.min(snapshot.ph);
        ph_range.1 = ph_range.1.max(snapshot.ph);
    }

    Ok(RunStats {
        tick_count: series.len(),
        elapsed_range: (
            parse_elapsed(&first.elapsed_time)?,
            parse_elapsed(&last.elapsed_time)?,
        ),
        temperature_range,
        ph_range,
        activations: output.summary.activations,
        time_to_target_temperature: output.summary.time_to_target_temperature,
    })
}

pub fn list_variables() -> &'static [&'static str] {
    &VARIABLES
}

/// Extract `(elapsed_s, value)` pairs for one variable.
///
/// Actuator variables come out as `1.0` (on) or `0.0` (off).
pub fn extract_series(series: &[StateSnapshot], variable: &str) -> AppResult<Vec<(u64, f64)>> {
    let pick: fn(&StateSnapshot) -> f64 = match variable {
        "temperature" => |s| s.temperature,
        "ph" | "pH" => |s| s.ph,
        "pump" => |s| as_level(s.pump),
        "acid_valve" => |s| as_level(s.acid_valve),
        "base_valve" => |s| as_level(s.base_valve),
        "agitator" => |s| as_level(s.agitator),
        _ => {
            return Err(AppError::InvalidInput(format!(
                "Unknown variable: {} (expected one of {})",
                variable,
                VARIABLES.join(", ")
            )));
        }
    };

    series
        .iter()
        .map(|snapshot| {
            let elapsed_s = parse_elapsed(&snapshot.elapsed_time)?;
            Ok::<_, AppError>((elapsed_s, pick(snapshot)))
        })
        .collect()
}

/// Fraction of recorded ticks during which an actuator was on.
pub fn duty_fraction(series: &[StateSnapshot], kind: ActuatorKind) -> AppResult<f64> {
    if series.is_empty() {
        return Err(AppError::InvalidInput("No snapshots in run".to_string()));
    }
    let on = series
        .iter()
        .filter(|snapshot| is_on(&snapshot.actuator_states(), kind))
        .count();
    Ok(on as f64 / series.len() as f64)
}

pub fn save_output(path: &Path, output: &RunOutput) -> AppResult<()> {
    save_run_output(path, output)?;
    Ok(())
}

pub fn load_output(path: &Path) -> AppResult<RunOutput> {
    Ok(load_run_output(path)?)
}

fn as_level(on: bool) -> f64 {
    if on { 1.0 } else { 0.0 }
}

fn is_on(states: &ActuatorStates, kind: ActuatorKind) -> bool {
    match kind {
        ActuatorKind::Pump => states.pump,
        ActuatorKind::Agitator => states.agitator,
        ActuatorKind::AcidValve => states.acid_valve,
        ActuatorKind::BaseValve => states.base_valve,
    }
}
