//! Malkus Waterwheel: Mechanical Lorenz Analogue
//!
//! A wheel of unit radius carries `num_buckets` leaky buckets evenly spaced
//! around its rim. Water pours in near the top, drains at rate K·mᵢ, and the
//! imbalance drives the wheel against viscous damping ν:
//!
//!   torque  = Σᵢ mᵢ sin(φᵢ),        φᵢ = θ + 2πi/N
//!   dω/dt   = torque - ν·ω
//!   dθ/dt   = ω
//!   dmᵢ/dt  = inflow(φᵢ) - K·mᵢ
//!
//! State layout is [ω, θ, m₁, …, m_N]. Bucket masses are clamped to be
//! non-negative after each step.

use std::f64::consts::PI;

use ndarray::{s, Array1};

use super::traits::{DerivativeModel, ParameterSet};
use super::SystemKind;
use crate::error::SimulationError;
use crate::integrator::Stepper;

/// Default number of buckets on the rim
pub const DEFAULT_BUCKETS: usize = 20;

/// Malkus waterwheel with fixed inflow, leak and damping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waterwheel {
    /// Number of buckets
    pub num_buckets: usize,
    /// Inflow rate Q
    pub inflow: f64,
    /// Leak rate K
    pub leak: f64,
    /// Damping ν
    pub damping: f64,
}

impl Waterwheel {
    pub fn new(num_buckets: usize, inflow: f64, leak: f64, damping: f64) -> Self {
        Self {
            num_buckets,
            inflow,
            leak,
            damping,
        }
    }

    /// Initial state with empty buckets
    pub fn initial_state(&self, omega: f64, theta: f64) -> Array1<f64> {
        let mut state = Array1::zeros(self.num_buckets + 2);
        state[0] = omega;
        state[1] = theta;
        state
    }

    /// Angle of bucket `i` when the wheel sits at `theta`
    pub fn bucket_angle(&self, theta: f64, i: usize) -> f64 {
        theta + 2.0 * PI * i as f64 / self.num_buckets as f64
    }

    /// Buckets fill only where cos(φ) exceeds |cos(2π/N)|, i.e. within one
    /// bucket spacing of the top
    pub fn inflow_threshold(&self) -> f64 {
        (2.0 * PI / self.num_buckets as f64).cos().abs()
    }

    /// Inflow into a bucket at angle `angle`
    pub fn inflow_at(&self, angle: f64) -> f64 {
        if angle.cos() > self.inflow_threshold() {
            let x = angle.tan().atan2(1.0);
            0.5 * self.inflow * ((self.num_buckets as f64 * x / 2.0).cos() + 1.0)
        } else {
            0.0
        }
    }

    /// Gravitational torque Σ mᵢ sin(φᵢ)
    pub fn torque(&self, state: &Array1<f64>) -> f64 {
        let theta = state[1];
        state
            .slice(s![2..])
            .iter()
            .enumerate()
            .map(|(i, &mass)| mass * self.bucket_angle(theta, i).sin())
            .sum()
    }

    /// Total water on the wheel
    pub fn bucket_mass_sum(&self, state: &Array1<f64>) -> f64 {
        state.slice(s![2..]).sum()
    }
}

impl Default for Waterwheel {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS, 2.5, 0.1, 1.0)
    }
}

impl DerivativeModel for Waterwheel {
    fn kind(&self) -> SystemKind {
        SystemKind::Waterwheel
    }

    fn dimension(&self) -> usize {
        self.num_buckets + 2
    }

    fn coordinate_names(&self) -> Vec<String> {
        let mut names = vec!["omega".to_string(), "theta".to_string()];
        names.extend((0..self.num_buckets).map(|i| format!("bucket_mass_{}", i + 1)));
        names
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .with("num_buckets", self.num_buckets as f64)
            .with("Q", self.inflow)
            .with("K", self.leak)
            .with("nu", self.damping)
    }

    fn derivative(&self, state: &Array1<f64>, _t: f64) -> Result<Array1<f64>, SimulationError> {
        self.check_dimension(state)?;
        let omega = state[0];
        let theta = state[1];

        let mut d = Array1::zeros(state.len());
        d[0] = self.torque(state) - self.damping * omega;
        d[1] = omega;

        for i in 0..self.num_buckets {
            let angle = self.bucket_angle(theta, i);
            d[i + 2] = self.inflow_at(angle) - self.leak * state[i + 2];
        }

        Ok(d)
    }

    fn apply_boundaries(&self, state: &mut Array1<f64>) {
        state
            .slice_mut(s![2..])
            .mapv_inplace(|mass| mass.max(0.0));
    }

    fn auxiliary_names(&self) -> &'static [&'static str] {
        &["bucket_mass_sum"]
    }

    fn auxiliary(&self, state: &Array1<f64>) -> Vec<f64> {
        vec![self.bucket_mass_sum(state)]
    }
}

/// Legacy waterwheel RK4 combination, kept for reproducing old datasets.
///
/// The stages are applied to the state in place (each stage starts from the
/// previous stage's state, not from the step origin) and the ω/θ update
/// subtracts three times a fifth derivative evaluation taken at the final
/// stage. Bucket masses are taken from the final stage unchanged apart from
/// clamping. This is not fourth-order accurate; use [`crate::integrator::Rk4`]
/// unless bit-compatibility with legacy datasets is required.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyWaterwheelRk4;

impl Stepper<Waterwheel> for LegacyWaterwheelRk4 {
    fn name(&self) -> &'static str {
        "legacy-rk4"
    }

    fn step(
        &self,
        model: &Waterwheel,
        state: &Array1<f64>,
        t: f64,
        dt: f64,
    ) -> Result<Array1<f64>, SimulationError> {
        let k1 = model.derivative(state, t)?;
        let s1 = state + &(&k1 * (0.5 * dt));

        let k2 = model.derivative(&s1, t)?;
        let s2 = &s1 + &(&k2 * (0.5 * dt));

        let k3 = model.derivative(&s2, t)?;
        let s3 = &s2 + &(&k3 * dt);

        let k4 = model.derivative(&s3, t)?;
        let correction = model.derivative(&s3, t)?;

        let mut next = s3.clone();
        for idx in 0..2 {
            next[idx] = s3[idx]
                + (dt / 6.0)
                    * (k1[idx] + 2.0 * k2[idx] + 2.0 * k3[idx] + k4[idx] - 3.0 * correction[idx]);
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_state_layout() {
        let wheel = Waterwheel::default();
        let state = wheel.initial_state(0.1, 0.5);
        assert_eq!(state.len(), DEFAULT_BUCKETS + 2);
        assert_eq!(wheel.coordinate_names().len(), wheel.dimension());
        assert_relative_eq!(wheel.bucket_mass_sum(&state), 0.0);
    }

    #[test]
    fn test_only_top_buckets_fill() {
        let wheel = Waterwheel::default();
        // Bucket 0 at θ = 0 sits at the top (cos = 1)
        assert!(wheel.inflow_at(0.0) > 0.0);
        assert_relative_eq!(wheel.inflow_at(0.0), wheel.inflow);
        // Bottom of the wheel receives nothing
        assert_relative_eq!(wheel.inflow_at(PI), 0.0);
        assert_relative_eq!(wheel.inflow_at(PI / 2.0), 0.0);
    }

    #[test]
    fn test_empty_wheel_only_damps() {
        let wheel = Waterwheel::default();
        let state = wheel.initial_state(0.4, 1.0);
        let d = wheel.derivative(&state, 0.0).unwrap();
        assert_relative_eq!(d[0], -wheel.damping * 0.4);
        assert_relative_eq!(d[1], 0.4);
    }

    #[test]
    fn test_leak_drains_buckets() {
        let wheel = Waterwheel::default();
        let mut state = wheel.initial_state(0.0, 0.0);
        // Bucket at the bottom: no inflow, pure leak
        let bottom = DEFAULT_BUCKETS / 2;
        state[bottom + 2] = 2.0;
        let d = wheel.derivative(&state, 0.0).unwrap();
        assert_relative_eq!(d[bottom + 2], -wheel.leak * 2.0);
    }

    #[test]
    fn test_boundaries_clamp_masses_only() {
        let wheel = Waterwheel::new(4, 2.5, 0.1, 1.0);
        let mut state = Array1::from(vec![-1.0, -2.0, -0.5, 0.3, -0.1, 0.0]);
        wheel.apply_boundaries(&mut state);
        assert_eq!(state.to_vec(), vec![-1.0, -2.0, 0.0, 0.3, 0.0, 0.0]);
    }

    #[test]
    fn test_legacy_step_matches_hand_computation() {
        let wheel = Waterwheel::new(4, 2.0, 0.1, 1.0);
        let state = wheel.initial_state(0.2, 0.0);
        let dt = 0.01;

        let next = LegacyWaterwheelRk4.step(&wheel, &state, 0.0, dt).unwrap();

        let k1 = wheel.derivative(&state, 0.0).unwrap();
        let s1 = &state + &(&k1 * (0.5 * dt));
        let k2 = wheel.derivative(&s1, 0.0).unwrap();
        let s2 = &s1 + &(&k2 * (0.5 * dt));
        let k3 = wheel.derivative(&s2, 0.0).unwrap();
        let s3 = &s2 + &(&k3 * dt);
        let k4 = wheel.derivative(&s3, 0.0).unwrap();

        let expected_omega = s3[0] + (dt / 6.0) * (k1[0] + 2.0 * k2[0] + 2.0 * k3[0] - 2.0 * k4[0]);
        assert_relative_eq!(next[0], expected_omega, epsilon = 1e-15);
        // Masses come straight from the last stage
        for i in 2..next.len() {
            assert_relative_eq!(next[i], s3[i]);
        }
    }
}
