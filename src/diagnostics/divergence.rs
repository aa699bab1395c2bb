//! Perturbed-trajectory divergence.
//!
//! Two trajectories integrated from initial conditions a small ε apart are
//! compared point by point. For a chaotic flow the separation grows roughly
//! like ε·e^{λt} until it saturates at the attractor diameter, so
//!
//!   λ ≈ (ln d(t) - ln d(0)) / t
//!
//! over the growth phase. This is an analysis aid and is not used to fill
//! the `lyapunov` feature of any dataset.

use ndarray::Array1;

use crate::error::SimulationError;
use crate::trajectory::Trajectory;

/// Euclidean distance between two states of equal dimension
pub fn separation(a: &Array1<f64>, b: &Array1<f64>) -> Result<f64, SimulationError> {
    if a.len() != b.len() {
        return Err(SimulationError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok((a - b).mapv(|v| v * v).sum().sqrt())
}

/// Per-point separation of two trajectories, truncated to the shorter one
pub fn divergence_curve(a: &Trajectory, b: &Trajectory) -> Result<Vec<f64>, SimulationError> {
    a.points
        .iter()
        .zip(&b.points)
        .map(|(p, q)| separation(&p.state, &q.state))
        .collect()
}

/// Finite-time growth rate (ln d_final - ln d_initial) / elapsed
///
/// Returns `None` when either separation is zero or the elapsed time is not
/// positive.
pub fn finite_time_growth_rate(initial: f64, final_separation: f64, elapsed: f64) -> Option<f64> {
    if initial <= 0.0 || final_separation <= 0.0 || elapsed <= 0.0 {
        return None;
    }
    Some((final_separation.ln() - initial.ln()) / elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::Rk4;
    use crate::systems::Lorenz;
    use crate::trajectory::TrajectoryGenerator;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_separation() {
        assert_relative_eq!(
            separation(&array![0.0, 0.0], &array![3.0, 4.0]).unwrap(),
            5.0
        );
        assert!(separation(&array![0.0], &array![1.0, 2.0]).is_err());
    }

    #[test]
    fn test_identical_trajectories_do_not_diverge() {
        let generator = TrajectoryGenerator::new(100, 0.01);
        let lorenz = Lorenz::classic();
        let a = generator.generate(0, &lorenz, &Rk4, array![1.0, 1.0, 1.0]).unwrap();
        let b = generator.generate(1, &lorenz, &Rk4, array![1.0, 1.0, 1.0]).unwrap();

        let curve = divergence_curve(&a, &b).unwrap();
        assert_eq!(curve.len(), 100);
        assert!(curve.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_lorenz_perturbation_grows() {
        let generator = TrajectoryGenerator::new(2000, 0.01);
        let lorenz = Lorenz::classic();
        let a = generator.generate(0, &lorenz, &Rk4, array![1.0, 1.0, 1.0]).unwrap();
        let b = generator
            .generate(1, &lorenz, &Rk4, array![1.0 + 1e-8, 1.0, 1.0])
            .unwrap();

        let curve = divergence_curve(&a, &b).unwrap();
        let last = *curve.last().unwrap();
        assert!(last > 1e3 * curve[0]);

        let rate = finite_time_growth_rate(1e-8, last, 20.0).unwrap();
        assert!(rate > 0.0);
    }

    #[test]
    fn test_growth_rate_guards() {
        assert!(finite_time_growth_rate(0.0, 1.0, 1.0).is_none());
        assert!(finite_time_growth_rate(1.0, 1.0, 0.0).is_none());
        assert_relative_eq!(
            finite_time_growth_rate(1.0, std::f64::consts::E, 2.0).unwrap(),
            0.5
        );
    }
}
