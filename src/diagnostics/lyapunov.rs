//! Single-trajectory Lyapunov proxy.
//!
//! This is not a Lyapunov exponent. No second trajectory is integrated; the
//! proxy averages the log separation, in (θ₁, θ₂) space, between each point
//! and the point [`LYAPUNOV_LAG`] steps earlier on the same trajectory:
//!
//!   λ̃ = mean_i ln ‖(θ₁[i] - θ₁[i-10], θ₂[i] - θ₂[i-10])‖
//!
//! Separations below [`MIN_SEPARATION`] are left out of the mean. Downstream
//! consumers depend on the numeric range of this value, so the formula is
//! kept as is.

/// Step lag between compared points
pub const LYAPUNOV_LAG: usize = 10;

/// Separations at or below this are excluded from the average
pub const MIN_SEPARATION: f64 = 1e-10;

/// Trajectories shorter than this get a proxy of 0.0
pub const MIN_POINTS: usize = 20;

/// Mean log lag-10 separation of the angle pair, 0.0 when undefined
pub fn lag_separation_proxy(theta1: &[f64], theta2: &[f64]) -> f64 {
    let n = theta1.len().min(theta2.len());
    if n < MIN_POINTS {
        return 0.0;
    }

    let mut sum_log = 0.0;
    let mut count = 0usize;

    for i in LYAPUNOV_LAG..n {
        let d1 = (theta1[i] - theta1[i - LYAPUNOV_LAG]).abs();
        let d2 = (theta2[i] - theta2[i - LYAPUNOV_LAG]).abs();
        let distance = (d1 * d1 + d2 * d2).sqrt();

        if distance > MIN_SEPARATION {
            sum_log += distance.ln();
            count += 1;
        }
    }

    if count > 0 {
        sum_log / count as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_short_series_returns_zero() {
        let theta: Vec<f64> = (0..19).map(|i| i as f64).collect();
        assert_eq!(lag_separation_proxy(&theta, &theta), 0.0);
    }

    #[test]
    fn test_constant_series_returns_zero() {
        let theta = vec![0.7; 100];
        assert_eq!(lag_separation_proxy(&theta, &theta), 0.0);
    }

    #[test]
    fn test_linear_drift() {
        // θ₁ advances 0.1 per step, θ₂ fixed: every lag-10 distance is 1.0
        let theta1: Vec<f64> = (0..50).map(|i| 0.1 * i as f64).collect();
        let theta2 = vec![0.0; 50];
        assert_relative_eq!(lag_separation_proxy(&theta1, &theta2), 0.0, epsilon = 1e-12);

        // Both advance 0.3 per step: distance = 3√2
        let both: Vec<f64> = (0..50).map(|i| 0.3 * i as f64).collect();
        assert_relative_eq!(
            lag_separation_proxy(&both, &both),
            (3.0 * 2f64.sqrt()).ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_deterministic() {
        let theta1: Vec<f64> = (0..200).map(|i| (i as f64 * 0.37).sin()).collect();
        let theta2: Vec<f64> = (0..200).map(|i| (i as f64 * 0.11).cos()).collect();
        assert_eq!(
            lag_separation_proxy(&theta1, &theta2),
            lag_separation_proxy(&theta1, &theta2)
        );
    }
}
