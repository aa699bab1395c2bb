//! Integrator Core: Fixed-Step Update Rules
//!
//! Two step policies are provided for every [`DerivativeModel`]:
//!
//! - **RK4**: four derivative evaluations per step, weights 1, 2, 2, 1
//!   scaled by dt/6. Used for the Lorenz, Rössler and double pendulum flows.
//! - **Euler**: `state += dt · f(state)`. Used for double-gyre advection and
//!   waterwheel bucket updates.
//!
//! A third, waterwheel-only policy (`legacy-rk4`) lives next to the model in
//! [`crate::systems::waterwheel`].
//!
//! There is no adaptive step-size control. Any non-finite coordinate after a
//! step aborts the trajectory.
//!
//! [`DerivativeModel`]: crate::systems::DerivativeModel

mod stepper;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use stepper::{advance, ensure_finite, Euler, Rk4, Stepper};

/// Step policy selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegratorKind {
    Rk4,
    Euler,
    /// Non-standard waterwheel RK4 combination for legacy datasets
    LegacyRk4,
}

impl IntegratorKind {
    pub fn name(&self) -> &'static str {
        match self {
            IntegratorKind::Rk4 => "rk4",
            IntegratorKind::Euler => "euler",
            IntegratorKind::LegacyRk4 => "legacy-rk4",
        }
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntegratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rk4" | "runge-kutta" => Ok(IntegratorKind::Rk4),
            "euler" => Ok(IntegratorKind::Euler),
            "legacy-rk4" | "legacy" => Ok(IntegratorKind::LegacyRk4),
            other => Err(format!("unknown integrator `{other}`")),
        }
    }
}
