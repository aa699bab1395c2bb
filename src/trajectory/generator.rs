//! Drives a stepper across a fixed number of steps from one initial state.

use ndarray::Array1;
use tracing::debug;

use super::{Trajectory, TrajectoryPoint};
use crate::error::SimulationError;
use crate::integrator::{advance, Stepper};
use crate::systems::DerivativeModel;

/// Fixed-step trajectory generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryGenerator {
    /// Number of integration steps (= number of recorded points)
    pub num_steps: usize,
    /// Fixed time step
    pub dt: f64,
}

impl TrajectoryGenerator {
    pub fn new(num_steps: usize, dt: f64) -> Self {
        Self { num_steps, dt }
    }

    /// Integrate `initial` forward `num_steps` times.
    ///
    /// One point is recorded per step holding the post-step state, so the
    /// first point sits at `t = dt`. The whole trajectory is discarded on the
    /// first numerical failure.
    pub fn generate<M, S>(
        &self,
        id: usize,
        model: &M,
        stepper: &S,
        initial: Array1<f64>,
    ) -> Result<Trajectory, SimulationError>
    where
        M: DerivativeModel + ?Sized,
        S: Stepper<M> + ?Sized,
    {
        model.check_dimension(&initial)?;

        let mut points = Vec::with_capacity(self.num_steps);
        let mut state = initial.clone();

        for step in 0..self.num_steps {
            let t = step as f64 * self.dt;
            state = advance(stepper, model, &state, step, t, self.dt)?;

            points.push(TrajectoryPoint {
                time: (step + 1) as f64 * self.dt,
                auxiliary: model.auxiliary(&state),
                state: state.clone(),
            });
        }

        debug!(
            trajectory_id = id,
            system = %model.kind(),
            integrator = stepper.name(),
            steps = self.num_steps,
            "trajectory integrated"
        );

        Ok(Trajectory {
            id,
            system: model.kind(),
            parameters: model.parameters(),
            coordinate_names: model.coordinate_names(),
            auxiliary_names: model.auxiliary_names().iter().map(|s| s.to_string()).collect(),
            initial_state: initial,
            dt: self.dt,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::{Euler, Rk4};
    use crate::systems::{DoubleGyre, Lorenz, Waterwheel};
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_length_and_time_grid() {
        let generator = TrajectoryGenerator::new(50, 0.01);
        let trajectory = generator
            .generate(0, &Lorenz::classic(), &Rk4, array![1.0, 1.0, 1.0])
            .unwrap();

        assert_eq!(trajectory.len(), 50);
        for (i, point) in trajectory.points.iter().enumerate() {
            assert_relative_eq!(point.time, (i + 1) as f64 * 0.01, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_records_post_step_state() {
        let lorenz = Lorenz::classic();
        let initial = array![1.0, 2.0, 3.0];
        let trajectory = TrajectoryGenerator::new(1, 0.01)
            .generate(0, &lorenz, &Rk4, initial.clone())
            .unwrap();

        let expected = Rk4.step(&lorenz, &initial, 0.0, 0.01).unwrap();
        assert_eq!(trajectory.points[0].state, expected);
        assert_ne!(trajectory.points[0].state, initial);
        assert_eq!(trajectory.initial_state, initial);
    }

    #[test]
    fn test_auxiliary_recorded_per_point() {
        let wheel = Waterwheel::default();
        let trajectory = TrajectoryGenerator::new(100, 0.01)
            .generate(0, &wheel, &Euler, wheel.initial_state(0.1, 0.0))
            .unwrap();

        let masses = trajectory.auxiliary_series("bucket_mass_sum").unwrap();
        assert_eq!(masses.len(), 100);
        // Water accumulates from an empty start
        assert!(masses[99] > masses[0]);
        assert!(masses.iter().all(|&m| m >= 0.0));
    }

    #[test]
    fn test_gyre_stays_in_domain() {
        let gyre = DoubleGyre::standard();
        let trajectory = TrajectoryGenerator::new(500, 0.02)
            .generate(0, &gyre, &Euler, array![1.95, 0.02])
            .unwrap();

        for point in &trajectory.points {
            assert!((0.0..=2.0).contains(&point.state[0]));
            assert!((0.0..=1.0).contains(&point.state[1]));
        }
    }

    #[test]
    fn test_divergence_aborts_generation() {
        // Absurd ρ blows the state up to infinity within a few steps
        let lorenz = Lorenz::new(1e200, 1e200, 1.0);
        let err = TrajectoryGenerator::new(200, 0.01)
            .generate(0, &lorenz, &Rk4, array![1.0, 1.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, SimulationError::NonFinite { .. }));
    }

    #[test]
    fn test_dimension_checked_up_front() {
        let err = TrajectoryGenerator::new(10, 0.01)
            .generate(0, &Lorenz::classic(), &Rk4, array![1.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, SimulationError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_zero_steps_yields_empty_trajectory() {
        let trajectory = TrajectoryGenerator::new(0, 0.01)
            .generate(4, &Lorenz::classic(), &Rk4, array![1.0, 1.0, 1.0])
            .unwrap();
        assert!(trajectory.is_empty());
        assert_eq!(trajectory.id, 4);
    }
}
