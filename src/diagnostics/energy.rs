//! Closed-form energy and distance metrics.

use ndarray::Array1;

/// Sum of squared coordinates (Lorenz pseudo-energy)
pub fn squared_norm(state: &Array1<f64>) -> f64 {
    state.iter().map(|v| v * v).sum()
}

/// Euclidean distance from the origin
pub fn euclidean_norm(state: &Array1<f64>) -> f64 {
    squared_norm(state).sqrt()
}

/// |(final - initial) / initial|, or 0 when the initial value is exactly zero
pub fn relative_drift(initial: f64, final_value: f64) -> f64 {
    if initial == 0.0 {
        0.0
    } else {
        ((final_value - initial) / initial).abs()
    }
}
