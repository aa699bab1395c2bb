//! Lorenz Attractor: Convection Rolls
//!
//! The Lorenz system is a three-mode truncation of Rayleigh-Bénard
//! convection:
//!
//!   dx/dt = σ(y - x)
//!   dy/dt = x(ρ - z) - y
//!   dz/dt = xy - βz
//!
//! For σ = 10, ρ = 28, β = 8/3 trajectories settle on the butterfly-shaped
//! strange attractor and hop irregularly between its two wings (x > 0 and
//! x < 0).

use ndarray::{array, Array1};

use super::traits::{DerivativeModel, ParameterSet};
use super::SystemKind;
use crate::diagnostics::energy::{euclidean_norm, squared_norm};
use crate::error::SimulationError;

/// Lorenz system with fixed parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lorenz {
    /// Prandtl number σ
    pub sigma: f64,
    /// Rayleigh number ρ
    pub rho: f64,
    /// Geometric factor β
    pub beta: f64,
}

impl Lorenz {
    pub fn new(sigma: f64, rho: f64, beta: f64) -> Self {
        Self { sigma, rho, beta }
    }

    /// Canonical chaotic parameters σ = 10, ρ = 28, β = 8/3
    pub fn classic() -> Self {
        Self::new(10.0, 28.0, 8.0 / 3.0)
    }
}

impl Default for Lorenz {
    fn default() -> Self {
        Self::classic()
    }
}

impl DerivativeModel for Lorenz {
    fn kind(&self) -> SystemKind {
        SystemKind::Lorenz
    }

    fn dimension(&self) -> usize {
        3
    }

    fn coordinate_names(&self) -> Vec<String> {
        vec!["x".into(), "y".into(), "z".into()]
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .with("sigma", self.sigma)
            .with("rho", self.rho)
            .with("beta", self.beta)
    }

    fn derivative(&self, state: &Array1<f64>, _t: f64) -> Result<Array1<f64>, SimulationError> {
        self.check_dimension(state)?;
        let (x, y, z) = (state[0], state[1], state[2]);

        Ok(array![
            self.sigma * (y - x),
            x * (self.rho - z) - y,
            x * y - self.beta * z,
        ])
    }

    fn auxiliary_names(&self) -> &'static [&'static str] {
        &["energy", "distance_from_origin"]
    }

    /// Pseudo-energy x² + y² + z² and distance from the origin
    fn auxiliary(&self, state: &Array1<f64>) -> Vec<f64> {
        vec![squared_norm(state), euclidean_norm(state)]
    }
}
