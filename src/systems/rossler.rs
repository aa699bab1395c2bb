//! Rössler Attractor: Single-Lobe Spiral Chaos
//!
//!   dx/dt = -y - z
//!   dy/dt = x + a·y
//!   dz/dt = b + z(x - c)
//!
//! With a = b = 0.2, c = 5.7 the flow spirals outward in the (x, y) plane
//! and is periodically re-injected by a spike in z.

use ndarray::{array, Array1};

use super::traits::{DerivativeModel, ParameterSet};
use super::SystemKind;
use crate::error::SimulationError;

/// Rössler system with fixed parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rossler {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Rossler {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Standard chaotic parameters a = 0.2, b = 0.2, c = 5.7
    pub fn classic() -> Self {
        Self::new(0.2, 0.2, 5.7)
    }
}

impl Default for Rossler {
    fn default() -> Self {
        Self::classic()
    }
}

impl DerivativeModel for Rossler {
    fn kind(&self) -> SystemKind {
        SystemKind::Rossler
    }

    fn dimension(&self) -> usize {
        3
    }

    fn coordinate_names(&self) -> Vec<String> {
        vec!["x".into(), "y".into(), "z".into()]
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .with("a", self.a)
            .with("b", self.b)
            .with("c", self.c)
    }

    fn derivative(&self, state: &Array1<f64>, _t: f64) -> Result<Array1<f64>, SimulationError> {
        self.check_dimension(state)?;
        let (x, y, z) = (state[0], state[1], state[2]);

        Ok(array![-y - z, x + self.a * y, self.b + z * (x - self.c)])
    }
}
