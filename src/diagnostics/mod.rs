//! Diagnostics Module: Trajectory-Level Measurements
//!
//! Quantities computed from a finished trajectory rather than per step:
//!
//! - **Energy**: closed-form norms and relative drift E_final vs E_initial
//! - **Lyapunov proxy**: mean log lag-10 separation on one trajectory
//! - **Behavior class**: periodic / chaotic / resonant heuristic
//! - **Divergence**: separation curve between two perturbed trajectories
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌──────────────┐
//! │  Trajectory  │ ──▶ │ DerivativeModel  │ ──▶ │  Trajectory  │
//! │   (points)   │     │   ::annotate()   │     │ Diagnostics  │
//! └──────────────┘     └──────────────────┘     └──────────────┘
//! ```
//!
//! Systems without trajectory-level diagnostics leave every field `None`.

pub mod classifier;
pub mod divergence;
pub mod energy;
pub mod lyapunov;

pub use classifier::{classify_behavior, BehaviorClass};
pub use divergence::divergence_curve;
pub use lyapunov::lag_separation_proxy;

/// Diagnostics attached to one trajectory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryDiagnostics {
    pub lyapunov: Option<f64>,
    pub behavior: Option<BehaviorClass>,
    /// Energy of the initial (pre-step) state
    pub initial_energy: Option<f64>,
    pub final_energy: Option<f64>,
    /// |(E_final - E_initial) / E_initial|
    pub energy_drift: Option<f64>,
}
