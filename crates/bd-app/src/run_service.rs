//! Registry of live environments and their run workers.
//!
//! Each registry slot owns one [`Environment`]. A run checks the environment
//! out of its slot, ticks it on the caller's thread or a dedicated worker, and
//! checks it back in. Only the environment's [`StopHandle`] stays behind, so a
//! stop never has to lock the environment itself.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use bd_core::EnvironmentId;
use bd_results::RunOutput;
use bd_sim::{Environment, EnvironmentConfig, RunStatus, StopHandle};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// What a stop request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The environment will stop before its next tick.
    Stopped,
    /// The environment had already finished or been asked to stop.
    AlreadyStopped,
}

/// Listing entry for one registered environment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentInfo {
    pub id: EnvironmentId,
    pub status: RunStatus,
    /// Elapsed simulated seconds, unknown while a worker holds the environment.
    pub elapsed_s: Option<u64>,
}

#[derive(Debug)]
struct Slot {
    env: Option<Environment>,
    stop: StopHandle,
}

type Registry = Arc<Mutex<HashMap<EnvironmentId, Slot>>>;

/// Thread-safe registry of independent environments.
#[derive(Debug, Clone, Default)]
pub struct SimulationService {
    slots: Registry,
}

impl SimulationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and register a new environment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfig`] if the configuration is rejected.
    pub fn create(&self, config: EnvironmentConfig) -> AppResult<EnvironmentId> {
        let env = Environment::new(config)?;
        let id = EnvironmentId::random();
        let stop = env.stop_handle();
        lock(&self.slots)?.insert(
            id.clone(),
            Slot {
                env: Some(env),
                stop,
            },
        );
        info!(%id, "environment created");
        Ok(id)
    }

    /// Run an environment to completion on the calling thread.
    pub fn run(&self, id: &EnvironmentId, until: Option<u64>) -> AppResult<RunOutput> {
        let mut env = checkout(&self.slots, id)?;
        let result = env.run(until);
        checkin(&self.slots, id, env);
        Ok(result?.output)
    }

    /// Run an environment on a dedicated worker thread.
    ///
    /// The environment stays registered while it runs, so [`Self::stop`]
    /// reaches it; [`Self::run`] and another `spawn_run` report it busy.
    pub fn spawn_run(&self, id: &EnvironmentId, until: Option<u64>) -> AppResult<RunWorker> {
        let mut env = checkout(&self.slots, id)?;
        let slots = Arc::clone(&self.slots);
        let worker_id = id.clone();

        let handle = thread::spawn(move || {
            let result = env.run(until);
            checkin(&slots, &worker_id, env);
            result.map(|report| report.output).map_err(AppError::from)
        });

        Ok(RunWorker {
            id: id.clone(),
            handle,
        })
    }

    /// Ask an environment to stop before its next tick.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EnvironmentNotFound`] for an unknown id.
    pub fn stop(&self, id: &EnvironmentId) -> AppResult<StopOutcome> {
        let slots = lock(&self.slots)?;
        let slot = slots
            .get(id)
            .ok_or_else(|| AppError::EnvironmentNotFound(id.clone()))?;

        // The handle knows about completion even while a worker holds the environment.
        if !slot.stop.stop() {
            warn!(%id, "stop requested on an inactive environment");
            return Ok(StopOutcome::AlreadyStopped);
        }

        info!(%id, "stop requested");
        Ok(StopOutcome::Stopped)
    }

    /// Drop an environment from the registry, stopping it if it is running.
    pub fn remove(&self, id: &EnvironmentId) -> AppResult<()> {
        let slot = lock(&self.slots)?
            .remove(id)
            .ok_or_else(|| AppError::EnvironmentNotFound(id.clone()))?;
        slot.stop.stop();
        info!(%id, "environment removed");
        Ok(())
    }

    pub fn info(&self, id: &EnvironmentId) -> AppResult<EnvironmentInfo> {
        let slots = lock(&self.slots)?;
        let slot = slots
            .get(id)
            .ok_or_else(|| AppError::EnvironmentNotFound(id.clone()))?;
        Ok(describe(id, slot))
    }

    /// Every registered environment, ordered by id.
    pub fn list(&self) -> AppResult<Vec<EnvironmentInfo>> {
        let slots = lock(&self.slots)?;
        let mut infos: Vec<_> = slots.iter().map(|(id, slot)| describe(id, slot)).collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(infos)
    }
}

/// Handle to a run executing on its own thread.
#[derive(Debug)]
pub struct RunWorker {
    id: EnvironmentId,
    handle: JoinHandle<AppResult<RunOutput>>,
}

impl RunWorker {
    pub fn id(&self) -> &EnvironmentId {
        &self.id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run and collect its output.
    pub fn join(self) -> AppResult<RunOutput> {
        let RunWorker { id, handle } = self;
        handle
            .join()
            .map_err(|_| AppError::Worker(format!("run worker for {id} panicked")))?
    }
}

fn lock(slots: &Registry) -> AppResult<MutexGuard<'_, HashMap<EnvironmentId, Slot>>> {
    slots
        .lock()
        .map_err(|_| AppError::Worker("environment registry lock poisoned".to_string()))
}

fn checkout(slots: &Registry, id: &EnvironmentId) -> AppResult<Environment> {
    let mut slots = lock(slots)?;
    let slot = slots
        .get_mut(id)
        .ok_or_else(|| AppError::EnvironmentNotFound(id.clone()))?;
    slot.env
        .take()
        .ok_or_else(|| AppError::EnvironmentBusy(id.clone()))
}

// A slot removed mid-run just lets the environment drop.
fn checkin(slots: &Registry, id: &EnvironmentId, env: Environment) {
    if let Ok(mut slots) = slots.lock() {
        if let Some(slot) = slots.get_mut(id) {
            slot.env = Some(env);
        }
    }
}

fn describe(id: &EnvironmentId, slot: &Slot) -> EnvironmentInfo {
    match &slot.env {
        Some(env) => EnvironmentInfo {
            id: id.clone(),
            status: env.status(),
            elapsed_s: Some(env.elapsed_s()),
        },
        None => EnvironmentInfo {
            id: id.clone(),
            status: RunStatus::Running,
            elapsed_s: None,
        },
    }
}
