//! Batch Module: Many Trajectories, One Report
//!
//! Trajectories are independent. Trajectory `i` draws from its own random
//! stream `(seed, i)`, so a batch gives identical results for any number of
//! workers:
//!
//! ```text
//!            ┌─ worker ─▶ [sample ▶ integrate ▶ annotate] ─┐
//!  ids ──────┼─ worker ─▶ [sample ▶ integrate ▶ annotate] ─┼──▶ merge by id ──▶ BatchReport
//!            └─ worker ─▶ [sample ▶ integrate ▶ annotate] ─┘
//! ```
//!
//! A numerical failure aborts only its own trajectory and is kept as an
//! [`AbortRecord`]. Cancellation is honoured between trajectories.

mod assemble;
mod runner;

use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::{ConfigError, SimulationError};
use crate::systems::ParameterSet;
use crate::trajectory::AnnotatedTrajectory;

pub use assemble::{assemble_dataset, label_distribution};
pub use runner::{run_batch, run_system};

/// Shape of one batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchConfig {
    pub trajectories: usize,
    pub steps: usize,
    pub dt: f64,
    pub seed: u64,
    /// Worker threads; 0 or 1 runs on the calling thread
    pub workers: usize,
    /// Id of the first trajectory, for resuming an interrupted batch
    pub first_id: usize,
}

impl BatchConfig {
    /// Trajectory ids covered by this batch
    pub fn ids(&self) -> Range<usize> {
        self.first_id..self.end_id()
    }

    /// One past the last id, saturating at `usize::MAX`
    pub fn end_id(&self) -> usize {
        self.first_id.saturating_add(self.trajectories)
    }

    /// Reject id ranges that run past `usize::MAX`
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.first_id.checked_add(self.trajectories) {
            Some(_) => Ok(()),
            None => Err(ConfigError::Invalid(format!(
                "first id {} plus {} trajectories overflows the id range",
                self.first_id, self.trajectories
            ))),
        }
    }
}

/// A trajectory that failed and was left out of the dataset
#[derive(Debug, Clone, PartialEq)]
pub struct AbortRecord {
    pub trajectory_id: usize,
    /// Empty when sampling itself failed
    pub initial_state: Vec<f64>,
    pub parameters: ParameterSet,
    pub error: SimulationError,
}

/// Outcome of a batch, completed trajectories in id order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub trajectories: Vec<AnnotatedTrajectory>,
    pub aborted: Vec<AbortRecord>,
    /// Set when cancellation stopped the batch early
    pub cancelled: bool,
    /// Lowest trajectory id skipped by cancellation
    pub resume_from: Option<usize>,
}

/// Counts reported at the end of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub aborted: usize,
    pub cancelled: bool,
    pub resume_from: Option<usize>,
    /// Behavior class counts, empty for systems without classes
    pub labels: BTreeMap<String, usize>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            completed: self.trajectories.len(),
            aborted: self.aborted.len(),
            cancelled: self.cancelled,
            resume_from: self.resume_from,
            labels: label_distribution(&self.trajectories),
        }
    }
}
