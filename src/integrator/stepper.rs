//! Fixed-step integrators.
//!
//! Both policies are pure maps (model, state, t, dt) → next state. Boundary
//! handling and finiteness checks are layered on top by [`advance`].

use ndarray::Array1;

use crate::error::SimulationError;
use crate::systems::DerivativeModel;

/// A fixed-step update rule for models of type `M`
pub trait Stepper<M: DerivativeModel + ?Sized> {
    /// Name recorded in dataset metadata
    fn name(&self) -> &'static str;

    /// Raw update, before boundary handling
    fn step(
        &self,
        model: &M,
        state: &Array1<f64>,
        t: f64,
        dt: f64,
    ) -> Result<Array1<f64>, SimulationError>;
}

/// Classical 4th-order Runge-Kutta
#[derive(Debug, Clone, Copy, Default)]
pub struct Rk4;

impl<M: DerivativeModel + ?Sized> Stepper<M> for Rk4 {
    fn name(&self) -> &'static str {
        "rk4"
    }

    fn step(
        &self,
        model: &M,
        state: &Array1<f64>,
        t: f64,
        dt: f64,
    ) -> Result<Array1<f64>, SimulationError> {
        let half = dt / 2.0;

        let k1 = model.derivative(state, t)?;
        let k2 = model.derivative(&(state + &(&k1 * half)), t + half)?;
        let k3 = model.derivative(&(state + &(&k2 * half)), t + half)?;
        let k4 = model.derivative(&(state + &(&k3 * dt)), t + dt)?;

        Ok(state + &((&k1 + &(&k2 * 2.0) + &(&k3 * 2.0) + &k4) * (dt / 6.0)))
    }
}

/// Explicit (forward) Euler
#[derive(Debug, Clone, Copy, Default)]
pub struct Euler;

impl<M: DerivativeModel + ?Sized> Stepper<M> for Euler {
    fn name(&self) -> &'static str {
        "euler"
    }

    fn step(
        &self,
        model: &M,
        state: &Array1<f64>,
        t: f64,
        dt: f64,
    ) -> Result<Array1<f64>, SimulationError> {
        let d = model.derivative(state, t)?;
        Ok(state + &(&d * dt))
    }
}

/// Fail on the first NaN or infinite coordinate
pub fn ensure_finite(state: &Array1<f64>, step: usize) -> Result<(), SimulationError> {
    match state.iter().position(|v| !v.is_finite()) {
        Some(coordinate) => Err(SimulationError::NonFinite {
            step,
            coordinate,
            value: state[coordinate],
        }),
        None => Ok(()),
    }
}

/// One complete step: update, finiteness check, then boundary handling.
///
/// The check runs before boundaries because clamping (`f64::max`) would turn
/// a NaN bucket mass into a silent zero.
pub fn advance<M, S>(
    stepper: &S,
    model: &M,
    state: &Array1<f64>,
    step: usize,
    t: f64,
    dt: f64,
) -> Result<Array1<f64>, SimulationError>
where
    M: DerivativeModel + ?Sized,
    S: Stepper<M> + ?Sized,
{
    let mut next = stepper
        .step(model, state, t, dt)
        .map_err(|err| err.at_step(step))?;
    ensure_finite(&next, step)?;
    model.apply_boundaries(&mut next);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{
        DoubleGyre, DoublePendulum, Lorenz, ParameterSet, SystemKind, Waterwheel,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    /// dy/dt = λy, solution y₀·e^{λt}
    struct Decay {
        lambda: f64,
    }

    impl DerivativeModel for Decay {
        fn kind(&self) -> SystemKind {
            SystemKind::Lorenz
        }
        fn dimension(&self) -> usize {
            1
        }
        fn coordinate_names(&self) -> Vec<String> {
            vec!["y".into()]
        }
        fn parameters(&self) -> ParameterSet {
            ParameterSet::new().with("lambda", self.lambda)
        }
        fn derivative(&self, state: &Array1<f64>, _t: f64) -> Result<Array1<f64>, SimulationError> {
            Ok(state * self.lambda)
        }
    }

    fn integrate<S: Stepper<Decay>>(stepper: &S, model: &Decay, dt: f64, t_end: f64) -> f64 {
        let n = (t_end / dt).round() as usize;
        let mut state = array![1.0];
        for i in 0..n {
            state = advance(stepper, model, &state, i, i as f64 * dt, dt).unwrap();
        }
        state[0]
    }

    #[test]
    fn test_rk4_matches_exponential() {
        let model = Decay { lambda: -1.3 };
        let y = integrate(&Rk4, &model, 0.01, 1.0);
        assert_relative_eq!(y, (-1.3f64).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_rk4_error_is_fourth_order() {
        let model = Decay { lambda: -2.0 };
        let exact = (-2.0f64).exp();
        let coarse = (integrate(&Rk4, &model, 0.1, 1.0) - exact).abs();
        let fine = (integrate(&Rk4, &model, 0.05, 1.0) - exact).abs();

        // Halving dt should cut the global error by ~2⁴ = 16
        let ratio = coarse / fine;
        assert!(ratio > 12.0 && ratio < 20.0, "error ratio {}", ratio);
    }

    #[test]
    fn test_euler_error_is_first_order() {
        let model = Decay { lambda: -2.0 };
        let exact = (-2.0f64).exp();
        let coarse = (integrate(&Euler, &model, 0.01, 1.0) - exact).abs();
        let fine = (integrate(&Euler, &model, 0.005, 1.0) - exact).abs();

        let ratio = coarse / fine;
        assert!(ratio > 1.8 && ratio < 2.2, "error ratio {}", ratio);
    }

    #[test]
    fn test_lorenz_z_axis_reduction() {
        // With x = y = 0 the Lorenz system reduces to dz/dt = -βz
        let lorenz = Lorenz::classic();
        let dt = 0.01;
        let mut state = array![0.0, 0.0, 5.0];
        for i in 0..100 {
            state = advance(&Rk4, &lorenz, &state, i, i as f64 * dt, dt).unwrap();
        }
        assert_relative_eq!(state[2], 5.0 * (-lorenz.beta).exp(), epsilon = 1e-8);
        assert_eq!(state[0], 0.0);
    }

    /// θ₁ after RK4 on a pendulum whose second bob is massless
    fn single_rod_theta(theta0: f64, dt: f64, t_end: f64) -> f64 {
        let pendulum = DoublePendulum::new(1.0, 1.0, 1.0, 1e-9, 9.81);
        let n = (t_end / dt).round() as usize;
        let mut state = array![theta0, 0.0, theta0, 0.0];
        for i in 0..n {
            state = advance(&Rk4, &pendulum, &state, i, i as f64 * dt, dt).unwrap();
        }
        state[0]
    }

    #[test]
    fn test_pendulum_small_angle_reduction() {
        // m₂ → 0 and small θ leave a simple pendulum: θ₀·cos(√(g/l)·t)
        let (theta0, t_end) = (1e-4, 1.5);
        let exact = theta0 * (9.81f64.sqrt() * t_end).cos();

        assert_relative_eq!(single_rod_theta(theta0, 0.01, t_end), exact, epsilon = 1e-10);

        let coarse = (single_rod_theta(theta0, 0.05, t_end) - exact).abs();
        let fine = (single_rod_theta(theta0, 0.025, t_end) - exact).abs();
        let ratio = coarse / fine;
        assert!(ratio > 12.0 && ratio < 20.0, "error ratio {}", ratio);
    }

    #[test]
    fn test_euler_single_step() {
        let lorenz = Lorenz::classic();
        let state = array![1.0, 1.0, 1.0];
        let next = Euler.step(&lorenz, &state, 0.0, 0.1).unwrap();
        let d = lorenz.derivative(&state, 0.0).unwrap();
        for i in 0..3 {
            assert_relative_eq!(next[i], state[i] + 0.1 * d[i]);
        }
    }

    #[test]
    fn test_non_finite_state_aborts() {
        let model = Decay { lambda: f64::INFINITY };
        let err = advance(&Euler, &model, &array![1.0], 7, 0.0, 0.1).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::NonFinite {
                step: 7,
                coordinate: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_nan_mass_is_not_clamped_away() {
        let wheel = Waterwheel::new(4, 2.0, 0.1, 1.0);
        let mut state = wheel.initial_state(0.1, 0.0);
        state[3] = f64::NAN;
        let err = advance(&Euler, &wheel, &state, 0, 0.0, 0.01).unwrap_err();
        assert!(matches!(err, SimulationError::NonFinite { step: 0, .. }));
    }

    #[test]
    fn test_gyre_boundaries_applied_after_step() {
        let gyre = DoubleGyre::standard();
        let next = advance(&Euler, &gyre, &array![0.5, 0.5], 0, 0.0, 0.02).unwrap();
        assert!((0.0..=2.0).contains(&next[0]));
        assert!((0.0..=1.0).contains(&next[1]));
    }
}
