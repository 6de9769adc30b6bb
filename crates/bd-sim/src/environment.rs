//! Environment: simulated clock, component ownership and the tick loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bd_controls::{Actuators, ControllerConfig, MicroController, Sensors};
use bd_core::Real;
use bd_results::{RunOutput, RunSummary, StateSnapshot, format_elapsed, format_timestamp};
use chrono::NaiveDateTime;
use tracing::{error, info, trace};

use crate::clock::SimClock;
use crate::digestor::{BioDigestor, DigestorParams, ProcessModel};
use crate::error::{SimError, SimResult};

/// Everything needed to build one environment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentConfig {
    /// Minutes per tick, must be positive.
    pub time_step_min: i64,
    /// Elapsed seconds after which the run ends, must be positive.
    pub horizon_s: i64,
    pub initial_temperature_c: Real,
    pub initial_ph: Real,
    /// Wall-clock label of elapsed time zero. Defaults to now (UTC).
    pub start_time: Option<NaiveDateTime>,
    pub digestor: DigestorParams,
    pub controller: ControllerConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            time_step_min: 5,
            horizon_s: 86_400,
            initial_temperature_c: 20.0,
            initial_ph: 7.0,
            start_time: None,
            digestor: DigestorParams::default(),
            controller: ControllerConfig::default(),
        }
    }
}

impl EnvironmentConfig {
    fn step_and_horizon(&self) -> SimResult<(u32, u64)> {
        if self.time_step_min <= 0 {
            return Err(SimError::InvalidConfig {
                what: "time step must be a positive number of minutes",
            });
        }
        let step = u32::try_from(self.time_step_min).map_err(|_| SimError::InvalidConfig {
            what: "time step is too large",
        })?;
        let horizon = u64::try_from(self.horizon_s)
            .ok()
            .filter(|horizon| *horizon > 0)
            .ok_or(SimError::InvalidConfig {
                what: "horizon must be a positive number of seconds",
            })?;
        Ok((step, horizon))
    }

    pub fn validate(&self) -> SimResult<()> {
        self.step_and_horizon()?;
        self.digestor.validate()?;
        self.controller.validate()?;
        bd_core::ensure_finite(self.initial_temperature_c, "initial temperature")?;
        bd_core::ensure_finite(self.initial_ph, "initial pH")?;
        Ok(())
    }
}

/// Lifecycle of an environment. A finished environment never ticks again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ready,
    Running,
    Finished(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Elapsed time passed the horizon.
    HorizonReached,
    /// A collaborator called stop.
    StopRequested,
    /// A tick hit an internal inconsistency.
    Faulted,
}

/// Cloneable handle that asks a running environment to stop.
///
/// The flag is checked at the top of each tick, so the tick in flight always
/// completes. The handle also sees when its environment has finished, even
/// while another thread still owns the environment.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl StopHandle {
    /// Request a stop. Returns `false` if one was already requested or the
    /// environment has already finished.
    pub fn stop(&self) -> bool {
        if self.is_finished() {
            return false;
        }
        !self.requested.swap(true, Ordering::SeqCst)
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    fn mark_finished(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }
}

/// Result of [`Environment::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub output: RunOutput,
    pub ticks: u64,
    pub stop_reason: StopReason,
}

/// One independent simulation: clock, digestor, sensors, actuators and controller.
#[derive(Debug)]
pub struct Environment {
    clock: SimClock,
    horizon_s: u64,
    start_time: NaiveDateTime,
    digestor: BioDigestor,
    sensors: Sensors,
    actuators: Actuators,
    controller: MicroController,
    time_series: Vec<StateSnapshot>,
    stop: StopHandle,
    status: RunStatus,
    fault: Option<SimError>,
}

impl Environment {
    /// Build an environment from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for a non-positive step or horizon,
    /// non-finite starting values, or an invalid controller or digestor setup.
    pub fn new(config: EnvironmentConfig) -> SimResult<Self> {
        config.validate()?;
        let (step_min, horizon_s) = config.step_and_horizon()?;

        let digestor = BioDigestor::new(
            config.digestor,
            config.initial_temperature_c,
            config.initial_ph,
        )?;
        let sensors = Sensors::attach(&digestor);
        let controller = MicroController::new(config.controller)?;
        let start_time = config
            .start_time
            .unwrap_or_else(|| chrono::Utc::now().naive_utc());

        Ok(Self {
            clock: SimClock::new(step_min)?,
            horizon_s,
            start_time,
            digestor,
            sensors,
            actuators: Actuators::new(),
            controller,
            time_series: Vec::new(),
            stop: StopHandle::default(),
            status: RunStatus::Ready,
            fault: None,
        })
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Ask the loop to stop before its next tick.
    pub fn stop(&self) -> bool {
        self.stop.stop()
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn elapsed_s(&self) -> u64 {
        self.clock.elapsed_s()
    }

    pub fn horizon_s(&self) -> u64 {
        self.horizon_s
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn digestor(&self) -> &BioDigestor {
        &self.digestor
    }

    pub fn sensors(&self) -> &Sensors {
        &self.sensors
    }

    pub fn actuators(&self) -> &Actuators {
        &self.actuators
    }

    pub fn controller(&self) -> &MicroController {
        &self.controller
    }

    pub fn time_series(&self) -> &[StateSnapshot] {
        &self.time_series
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            activations: self.actuators.activation_counts(),
            time_to_target_temperature: self.controller.time_to_target_s(),
        }
    }

    pub fn output(&self) -> RunOutput {
        RunOutput {
            time_series: self.time_series.clone(),
            summary: self.summary(),
        }
    }

    /// Advance one tick: clock, process model, sensors, controller, snapshot.
    ///
    /// The controller always sees readings taken after this tick's model update.
    pub fn tick(&mut self) -> SimResult<&StateSnapshot> {
        let now_s = self.clock.advance()?;
        self.digestor
            .step(&self.actuators.states(), self.clock.step_min())?;
        self.sensors.refresh(&self.digestor);
        self.controller
            .update(&self.sensors, &mut self.actuators, now_s);

        trace!(
            elapsed_s = now_s,
            temperature = self.digestor.temperature_c(),
            ph = self.digestor.ph(),
            "tick"
        );
        Ok(self.record(now_s))
    }

    fn record(&mut self, now_s: u64) -> &StateSnapshot {
        let states = self.actuators.states();
        self.time_series.push(StateSnapshot {
            time: format_timestamp(self.start_time, now_s),
            elapsed_time: format_elapsed(now_s),
            temperature: self.digestor.temperature_c(),
            ph: self.digestor.ph(),
            pump: states.pump,
            acid_valve: states.acid_valve,
            base_valve: states.base_valve,
            agitator: states.agitator,
        });
        &self.time_series[self.time_series.len() - 1]
    }

    /// The fault that aborted the run, if any.
    pub fn fault(&self) -> Option<&SimError> {
        self.fault.as_ref()
    }

    /// Tick until a stop is requested or elapsed time exceeds the horizon.
    ///
    /// `until` replaces the configured horizon for this run. A finished
    /// environment returns its recorded output without ticking again.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Fault`] if a tick hits an internal inconsistency;
    /// the environment is then finished with [`StopReason::Faulted`] and
    /// every later `run` returns the same fault.
    pub fn run(&mut self, until: Option<u64>) -> SimResult<RunReport> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if let RunStatus::Finished(stop_reason) = self.status {
            return Ok(self.report(stop_reason));
        }

        let horizon_s = until.unwrap_or(self.horizon_s);
        self.status = RunStatus::Running;
        info!(
            horizon_s,
            step_min = self.clock.step_min(),
            temperature = self.digestor.temperature_c(),
            ph = self.digestor.ph(),
            "simulation started"
        );

        let stop_reason = loop {
            if self.stop.is_requested() {
                break StopReason::StopRequested;
            }
            if self.clock.elapsed_s() > horizon_s {
                break StopReason::HorizonReached;
            }
            if let Err(err) = self.tick().map(|_| ()) {
                self.status = RunStatus::Finished(StopReason::Faulted);
                self.fault = Some(err.clone());
                self.stop.mark_finished();
                error!(elapsed_s = self.clock.elapsed_s(), %err, "simulation aborted");
                return Err(err);
            }
        };

        self.status = RunStatus::Finished(stop_reason);
        self.stop.mark_finished();
        info!(
            ticks = self.clock.ticks(),
            elapsed_s = self.clock.elapsed_s(),
            reason = ?stop_reason,
            "simulation finished"
        );
        Ok(self.report(stop_reason))
    }

    fn report(&self, stop_reason: StopReason) -> RunReport {
        RunReport {
            output: self.output(),
            ticks: self.clock.ticks(),
            stop_reason,
        }
    }
}
