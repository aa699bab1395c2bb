//! Double Gyre: Time-Periodic Ocean Circulation
//!
//! Passive tracer advection (no inertia) in the velocity field
//!
//!   u = -πA sin(π f(x,t)) cos(πy)
//!   v =  πA cos(π f(x,t)) sin(πy) ∂f/∂x
//!
//! with f(x,t) = a(t)x² + b(t)x, a(t) = ε sin(ωt), b(t) = 1 - 2ε sin(ωt).
//!
//! The domain is [0, 2] × [0, 1]: periodic in x, reflecting in y. Boundary
//! handling happens after each integration step, never inside the field.

use std::f64::consts::PI;

use ndarray::{array, Array1};

use super::traits::{DerivativeModel, ParameterSet};
use super::SystemKind;
use crate::error::SimulationError;

/// Domain width (periodic direction)
pub const DOMAIN_WIDTH: f64 = 2.0;

/// Domain height (reflecting direction)
pub const DOMAIN_HEIGHT: f64 = 1.0;

/// Double-gyre flow with fixed amplitude and forcing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleGyre {
    /// Velocity amplitude A
    pub amplitude: f64,
    /// Gyre oscillation magnitude ε
    pub epsilon: f64,
    /// Forcing angular frequency ω
    pub omega: f64,
}

impl DoubleGyre {
    pub fn new(amplitude: f64, epsilon: f64, omega: f64) -> Self {
        Self {
            amplitude,
            epsilon,
            omega,
        }
    }

    /// A = 0.1, ε = 0.25, ω = 0.5
    pub fn standard() -> Self {
        Self::new(0.1, 0.25, 0.5)
    }

    /// Gyre modulation a(t), b(t)
    pub fn time_functions(&self, t: f64) -> (f64, f64) {
        let sin_wt = (self.omega * t).sin();
        (self.epsilon * sin_wt, 1.0 - 2.0 * self.epsilon * sin_wt)
    }

    /// f(x, t) and ∂f/∂x
    pub fn forcing(&self, x: f64, t: f64) -> (f64, f64) {
        let (a, b) = self.time_functions(t);
        (a * x * x + b * x, 2.0 * a * x + b)
    }

    /// Velocity (u, v) at (x, y, t)
    pub fn velocity(&self, x: f64, y: f64, t: f64) -> (f64, f64) {
        let (f, dfdx) = self.forcing(x, t);
        let pi_f = PI * f;
        let pi_y = PI * y;

        let u = -PI * self.amplitude * pi_f.sin() * pi_y.cos();
        let v = PI * self.amplitude * pi_f.cos() * pi_y.sin() * dfdx;
        (u, v)
    }
}

impl Default for DoubleGyre {
    fn default() -> Self {
        Self::standard()
    }
}

/// Wrap `x` into [0, width]; tiny negative inputs round up to exactly `width`
pub fn wrap_periodic(x: f64, width: f64) -> f64 {
    x.rem_euclid(width)
}

/// Mirror `y` back into [0, height], folding repeatedly for large overshoots
pub fn reflect(y: f64, height: f64) -> f64 {
    let folded = y.rem_euclid(2.0 * height);
    if folded > height {
        2.0 * height - folded
    } else {
        folded
    }
}

impl DerivativeModel for DoubleGyre {
    fn kind(&self) -> SystemKind {
        SystemKind::DoubleGyre
    }

    fn dimension(&self) -> usize {
        2
    }

    fn coordinate_names(&self) -> Vec<String> {
        vec!["x".into(), "y".into()]
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .with("A", self.amplitude)
            .with("epsilon", self.epsilon)
            .with("omega", self.omega)
    }

    fn derivative(&self, state: &Array1<f64>, t: f64) -> Result<Array1<f64>, SimulationError> {
        self.check_dimension(state)?;
        let (u, v) = self.velocity(state[0], state[1], t);
        Ok(array![u, v])
    }

    fn apply_boundaries(&self, state: &mut Array1<f64>) {
        state[0] = wrap_periodic(state[0], DOMAIN_WIDTH);
        state[1] = reflect(state[1], DOMAIN_HEIGHT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_time_functions_at_rest() {
        let gyre = DoubleGyre::standard();
        let (a, b) = gyre.time_functions(0.0);
        assert_relative_eq!(a, 0.0);
        assert_relative_eq!(b, 1.0);
    }

    #[test]
    fn test_gyre_centre_is_stagnant() {
        // At t = 0, f(x) = x and the left gyre centre sits at (0.5, 0.5)
        let gyre = DoubleGyre::standard();
        let (u, v) = gyre.velocity(0.5, 0.5, 0.0);
        assert!(u.abs() < 1e-12 && v.abs() < 1e-12, "u={u}, v={v}");
    }

    #[test]
    fn test_walls_have_no_normal_flow() {
        let gyre = DoubleGyre::standard();
        for &x in &[0.1, 0.7, 1.3, 1.9] {
            let (_, v_bottom) = gyre.velocity(x, 0.0, 0.3);
            let (_, v_top) = gyre.velocity(x, 1.0, 0.3);
            assert!(v_bottom.abs() < 1e-12);
            assert!(v_top.abs() < 1e-12);
        }
    }

    #[test]
    fn test_wrap_and_reflect() {
        assert_relative_eq!(wrap_periodic(-0.1, 2.0), 1.9, epsilon = 1e-12);
        assert_relative_eq!(wrap_periodic(2.25, 2.0), 0.25);
        assert_relative_eq!(wrap_periodic(1.5, 2.0), 1.5);
        assert!((0.0..=2.0).contains(&wrap_periodic(-1e-17, 2.0)));

        assert_relative_eq!(reflect(-0.1, 1.0), 0.1, epsilon = 1e-12);
        assert_relative_eq!(reflect(1.2, 1.0), 0.8, epsilon = 1e-12);
        assert_relative_eq!(reflect(0.4, 1.0), 0.4);
    }

    #[test]
    fn test_boundaries_applied_to_state() {
        let gyre = DoubleGyre::standard();
        let mut state = array![2.05, -0.02];
        gyre.apply_boundaries(&mut state);
        assert_relative_eq!(state[0], 0.05, epsilon = 1e-12);
        assert_relative_eq!(state[1], 0.02, epsilon = 1e-12);
    }
}
