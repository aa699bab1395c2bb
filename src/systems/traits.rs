//! Dynamical System Traits: Standardized API for Dataset Synthesis
//!
//! Every chaotic system in the crate implements [`DerivativeModel`]. The trait
//! separates the pure vector field from everything that happens around it:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DerivativeModel Trait                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + derivative()        - (state, t) → dstate/dt (pure)      │
//! │  + apply_boundaries()  - wrap / reflect / clamp after step  │
//! │  + auxiliary()         - cheap per-step scalars (energy…)   │
//! │  + annotate()          - trajectory-level diagnostics       │
//! │  + parameters()        - named constants for the dataset    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parameters live inside the implementing struct and are never mutated
//! after construction, so `derivative` is a function of its arguments alone.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::SystemKind;
use crate::diagnostics::TrajectoryDiagnostics;
use crate::error::SimulationError;
use crate::integrator::IntegratorKind;
use crate::trajectory::Trajectory;

/// Vector field of one chaotic system under fixed parameters
pub trait DerivativeModel {
    /// Which system this is
    fn kind(&self) -> SystemKind;

    /// Number of state coordinates
    fn dimension(&self) -> usize;

    /// Names of the state coordinates, in state order
    fn coordinate_names(&self) -> Vec<String>;

    /// Named parameter values, in a stable order
    fn parameters(&self) -> ParameterSet;

    /// Time derivative of `state` at time `t`
    ///
    /// Must not have side effects: RK4 evaluates it four times per step at
    /// perturbed states and relies on identical inputs giving identical
    /// outputs.
    fn derivative(&self, state: &Array1<f64>, t: f64) -> Result<Array1<f64>, SimulationError>;

    /// Post-step boundary handling (periodic wrap, reflection, clamping)
    fn apply_boundaries(&self, _state: &mut Array1<f64>) {}

    /// Names of the auxiliary per-step scalars
    fn auxiliary_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Auxiliary per-step scalars for `state`, ordered as `auxiliary_names`
    fn auxiliary(&self, _state: &Array1<f64>) -> Vec<f64> {
        Vec::new()
    }

    /// Trajectory-level diagnostics (Lyapunov proxy, behavior class, drift)
    fn annotate(&self, _trajectory: &Trajectory) -> TrajectoryDiagnostics {
        TrajectoryDiagnostics::default()
    }

    /// Step policy used when the configuration does not pick one
    fn default_integrator(&self) -> IntegratorKind {
        self.kind().default_integrator()
    }

    /// Verify a state vector has the right number of coordinates
    fn check_dimension(&self, state: &Array1<f64>) -> Result<(), SimulationError> {
        if state.len() != self.dimension() {
            return Err(SimulationError::DimensionMismatch {
                expected: self.dimension(),
                actual: state.len(),
            });
        }
        Ok(())
    }
}

/// Ordered, named system constants attached to a trajectory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    entries: Vec<(String, f64)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, keeps insertion order
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.entries.push((name.to_string(), value));
        self
    }

    /// Look up a parameter by name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| *value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_set_preserves_order() {
        let params = ParameterSet::new()
            .with("sigma", 10.0)
            .with("rho", 28.0)
            .with("beta", 8.0 / 3.0);

        let names: Vec<&str> = params.names().collect();
        assert_eq!(names, vec!["sigma", "rho", "beta"]);
        assert_eq!(params.get("rho"), Some(28.0));
        assert_eq!(params.get("gamma"), None);
        assert_eq!(params.len(), 3);
    }
}
