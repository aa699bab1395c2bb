//! Trajectory Module: Recorded Integration Runs
//!
//! A [`Trajectory`] is the complete, gap-free record of one initial
//! condition integrated under one parameter set. It is created in a single
//! [`TrajectoryGenerator::generate`] call, annotated once with
//! [`TrajectoryDiagnostics`](crate::diagnostics::TrajectoryDiagnostics), and
//! then sliced into samples or windows.

mod generator;

use ndarray::Array1;

use crate::diagnostics::TrajectoryDiagnostics;
use crate::systems::{ParameterSet, SystemKind};

pub use generator::TrajectoryGenerator;

/// One recorded step
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPoint {
    /// Simulation time after the step
    pub time: f64,
    /// Full post-step state
    pub state: Array1<f64>,
    /// Auxiliary scalars, ordered as [`Trajectory::auxiliary_names`]
    pub auxiliary: Vec<f64>,
}

/// Ordered, fixed-dt sequence of points from one initial condition
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub id: usize,
    pub system: SystemKind,
    pub parameters: ParameterSet,
    pub coordinate_names: Vec<String>,
    pub auxiliary_names: Vec<String>,
    /// State before the first step (not itself a recorded point)
    pub initial_state: Array1<f64>,
    pub dt: f64,
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    /// Values of state coordinate `index` across all points
    pub fn coordinate_series(&self, index: usize) -> Vec<f64> {
        self.points.iter().map(|p| p.state[index]).collect()
    }

    /// Position of a named state coordinate
    pub fn coordinate_index(&self, name: &str) -> Option<usize> {
        self.coordinate_names.iter().position(|n| n == name)
    }

    /// Position of a named auxiliary quantity
    pub fn auxiliary_index(&self, name: &str) -> Option<usize> {
        self.auxiliary_names.iter().position(|n| n == name)
    }

    /// Values of a named auxiliary quantity across all points
    pub fn auxiliary_series(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.auxiliary_index(name)?;
        Some(self.points.iter().map(|p| p.auxiliary[index]).collect())
    }
}

/// A trajectory together with its trajectory-level diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTrajectory {
    pub trajectory: Trajectory,
    pub diagnostics: TrajectoryDiagnostics,
}
