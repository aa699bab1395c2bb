//! Double Pendulum: Coupled Rigid-Rod Oscillators
//!
//! Two point masses m₁, m₂ hang from massless rigid rods of length l₁, l₂
//! under gravity g. With δ = θ₂ - θ₁ the Lagrangian equations of motion are
//!
//!   dθ₁/dt = ω₁
//!   dω₁/dt = [m₂l₁ω₁² sinδ cosδ + m₂g sinθ₂ cosδ + m₂l₂ω₂² sinδ
//!             - (m₁+m₂)g sinθ₁] / den₁
//!   dθ₂/dt = ω₂
//!   dω₂/dt = [-m₂l₂ω₂² sinδ cosδ + (m₁+m₂)g sinθ₁ cosδ
//!             - (m₁+m₂)l₁ω₁² sinδ - (m₁+m₂)g sinθ₂] / den₂
//!
//! where den₁ = (m₁+m₂)l₁ - m₂l₁cos²δ and den₂ = (l₂/l₁)·den₁.
//!
//! ## Singular Configurations
//!
//! A denominator whose magnitude drops below [`SINGULARITY_EPSILON`] is
//! reported as [`SimulationError::SingularConfiguration`] instead of being
//! divided through.
//!
//! ## Diagnostics
//!
//! Trajectories are annotated with mechanical energy drift, the lag-10
//! Lyapunov proxy, and a periodic / resonant / chaotic behavior class.

use ndarray::{array, Array1};

use super::traits::{DerivativeModel, ParameterSet};
use super::SystemKind;
use crate::diagnostics::classifier::classify_behavior;
use crate::diagnostics::energy::relative_drift;
use crate::diagnostics::lyapunov::lag_separation_proxy;
use crate::diagnostics::TrajectoryDiagnostics;
use crate::error::SimulationError;
use crate::trajectory::Trajectory;

/// Smallest denominator magnitude accepted by the equations of motion
pub const SINGULARITY_EPSILON: f64 = 1e-9;

/// Standard gravity used by the sampler
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Cartesian bob positions (x₁, y₁, x₂, y₂), pivot at the origin, y up
pub type BobPositions = (f64, f64, f64, f64);

/// Double pendulum with fixed rod lengths, masses and gravity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoublePendulum {
    pub l1: f64,
    pub l2: f64,
    pub m1: f64,
    pub m2: f64,
    pub g: f64,
}

impl DoublePendulum {
    pub fn new(l1: f64, l2: f64, m1: f64, m2: f64, g: f64) -> Self {
        Self { l1, l2, m1, m2, g }
    }

    /// Unit rods and masses under standard gravity
    pub fn standard() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0, STANDARD_GRAVITY)
    }

    /// The two equation-of-motion denominators for angle difference δ
    pub fn denominators(&self, delta: f64) -> (f64, f64) {
        let cos_delta = delta.cos();
        let den1 = (self.m1 + self.m2) * self.l1 - self.m2 * self.l1 * cos_delta * cos_delta;
        let den2 = (self.l2 / self.l1) * den1;
        (den1, den2)
    }

    /// Bob positions for state [θ₁, ω₁, θ₂, ω₂]
    pub fn positions(&self, state: &Array1<f64>) -> BobPositions {
        let (theta1, theta2) = (state[0], state[2]);

        let x1 = self.l1 * theta1.sin();
        let y1 = -self.l1 * theta1.cos();
        let x2 = x1 + self.l2 * theta2.sin();
        let y2 = y1 - self.l2 * theta2.cos();

        (x1, y1, x2, y2)
    }

    /// Total mechanical energy KE + PE
    pub fn energy(&self, state: &Array1<f64>) -> f64 {
        let (theta1, omega1, theta2, omega2) = (state[0], state[1], state[2], state[3]);
        let (_, y1, _, y2) = self.positions(state);

        let v1x = self.l1 * omega1 * theta1.cos();
        let v1y = self.l1 * omega1 * theta1.sin();
        let v2x = v1x + self.l2 * omega2 * theta2.cos();
        let v2y = v1y + self.l2 * omega2 * theta2.sin();

        let kinetic =
            0.5 * self.m1 * (v1x * v1x + v1y * v1y) + 0.5 * self.m2 * (v2x * v2x + v2y * v2y);
        let potential = self.m1 * self.g * y1 + self.m2 * self.g * y2;

        kinetic + potential
    }
}

impl Default for DoublePendulum {
    fn default() -> Self {
        Self::standard()
    }
}

impl DerivativeModel for DoublePendulum {
    fn kind(&self) -> SystemKind {
        SystemKind::DoublePendulum
    }

    fn dimension(&self) -> usize {
        4
    }

    fn coordinate_names(&self) -> Vec<String> {
        vec![
            "theta1".into(),
            "omega1".into(),
            "theta2".into(),
            "omega2".into(),
        ]
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .with("l1", self.l1)
            .with("l2", self.l2)
            .with("m1", self.m1)
            .with("m2", self.m2)
            .with("g", self.g)
    }

    fn derivative(&self, state: &Array1<f64>, _t: f64) -> Result<Array1<f64>, SimulationError> {
        self.check_dimension(state)?;
        let (theta1, omega1, theta2, omega2) = (state[0], state[1], state[2], state[3]);
        let (l1, l2, m1, m2, g) = (self.l1, self.l2, self.m1, self.m2, self.g);

        let delta = theta2 - theta1;
        let (den1, den2) = self.denominators(delta);
        for den in [den1, den2] {
            if den.is_nan() || den.abs() < SINGULARITY_EPSILON {
                return Err(SimulationError::SingularConfiguration {
                    step: 0,
                    denominator: den,
                });
            }
        }

        let (sin_d, cos_d) = delta.sin_cos();

        let domega1 = (m2 * l1 * omega1 * omega1 * sin_d * cos_d
            + m2 * g * theta2.sin() * cos_d
            + m2 * l2 * omega2 * omega2 * sin_d
            - (m1 + m2) * g * theta1.sin())
            / den1;

        let domega2 = (-m2 * l2 * omega2 * omega2 * sin_d * cos_d
            + (m1 + m2) * g * theta1.sin() * cos_d
            - (m1 + m2) * l1 * omega1 * omega1 * sin_d
            - (m1 + m2) * g * theta2.sin())
            / den2;

        Ok(array![omega1, domega1, omega2, domega2])
    }

    fn auxiliary_names(&self) -> &'static [&'static str] {
        &["energy", "x1", "y1", "x2", "y2"]
    }

    fn auxiliary(&self, state: &Array1<f64>) -> Vec<f64> {
        let (x1, y1, x2, y2) = self.positions(state);
        vec![self.energy(state), x1, y1, x2, y2]
    }

    fn annotate(&self, trajectory: &Trajectory) -> TrajectoryDiagnostics {
        let theta1 = trajectory.coordinate_series(0);
        let omega1 = trajectory.coordinate_series(1);
        let theta2 = trajectory.coordinate_series(2);
        let omega2 = trajectory.coordinate_series(3);

        let initial_energy = self.energy(&trajectory.initial_state);
        let final_energy = trajectory
            .last()
            .map(|point| self.energy(&point.state))
            .unwrap_or(initial_energy);

        TrajectoryDiagnostics {
            lyapunov: Some(lag_separation_proxy(&theta1, &theta2)),
            behavior: Some(classify_behavior(&theta1, &omega1, &theta2, &omega2)),
            initial_energy: Some(initial_energy),
            final_energy: Some(final_energy),
            energy_drift: Some(relative_drift(initial_energy, final_energy)),
        }
    }
}
