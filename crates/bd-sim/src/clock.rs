//! Fixed-step simulated clock.
//!
//! Time is a plain monotonic counter of elapsed seconds. Calendar rendering
//! is left to the display layer.

use crate::error::{SimError, SimResult};
use bd_core::minutes_to_seconds;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimClock {
    step_min: u32,
    step_s: u64,
    elapsed_s: u64,
    ticks: u64,
}

impl SimClock {
    /// # Errors
    ///
    /// Returns error if `step_min` is zero; such a clock would never advance.
    pub fn new(step_min: u32) -> SimResult<Self> {
        if step_min == 0 {
            return Err(SimError::InvalidConfig {
                what: "time step must be positive",
            });
        }
        Ok(Self {
            step_min,
            step_s: minutes_to_seconds(step_min),
            elapsed_s: 0,
            ticks: 0,
        })
    }

    pub fn step_min(&self) -> u32 {
        self.step_min
    }

    pub fn step_s(&self) -> u64 {
        self.step_s
    }

    pub fn elapsed_s(&self) -> u64 {
        self.elapsed_s
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance one step and return the new elapsed time.
    pub fn advance(&mut self) -> SimResult<u64> {
        self.elapsed_s = self
            .elapsed_s
            .checked_add(self.step_s)
            .ok_or_else(|| SimError::Fault {
                what: "elapsed time overflow".to_string(),
            })?;
        self.ticks += 1;
        Ok(self.elapsed_s)
    }
}
