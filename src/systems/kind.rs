//! System identifiers shared by configuration, export and dispatch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::integrator::IntegratorKind;

/// The five supported chaotic systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemKind {
    #[serde(rename = "lorenz-attractor")]
    Lorenz,
    #[serde(rename = "rossler-attractor")]
    Rossler,
    #[serde(rename = "double-pendulum")]
    DoublePendulum,
    #[serde(rename = "malkus-waterwheel")]
    Waterwheel,
    #[serde(rename = "double-gyre")]
    DoubleGyre,
}

impl SystemKind {
    pub const ALL: [SystemKind; 5] = [
        SystemKind::Lorenz,
        SystemKind::Rossler,
        SystemKind::DoublePendulum,
        SystemKind::Waterwheel,
        SystemKind::DoubleGyre,
    ];

    /// Identifier written into dataset metadata (`simulator` field)
    pub fn id(&self) -> &'static str {
        match self {
            SystemKind::Lorenz => "lorenz-attractor",
            SystemKind::Rossler => "rossler-attractor",
            SystemKind::DoublePendulum => "double-pendulum",
            SystemKind::Waterwheel => "malkus-waterwheel",
            SystemKind::DoubleGyre => "double-gyre",
        }
    }

    /// Prefix for exported file names
    pub fn file_prefix(&self) -> &'static str {
        match self {
            SystemKind::Lorenz => "lorenz",
            SystemKind::Rossler => "rossler",
            SystemKind::DoublePendulum => "double_pendulum",
            SystemKind::Waterwheel => "malkus",
            SystemKind::DoubleGyre => "double_gyre",
        }
    }

    pub fn default_dt(&self) -> f64 {
        match self {
            SystemKind::DoubleGyre => 0.02,
            _ => 0.01,
        }
    }

    /// RK4 for the smooth ODEs, Euler for advection and bucket updates
    pub fn default_integrator(&self) -> IntegratorKind {
        match self {
            SystemKind::Lorenz | SystemKind::Rossler | SystemKind::DoublePendulum => {
                IntegratorKind::Rk4
            }
            SystemKind::Waterwheel | SystemKind::DoubleGyre => IntegratorKind::Euler,
        }
    }

    /// Only the double pendulum carries a behavior class
    pub fn supports_classification(&self) -> bool {
        matches!(self, SystemKind::DoublePendulum)
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SystemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lorenz" | "lorenz-attractor" => Ok(SystemKind::Lorenz),
            "rossler" | "rössler" | "rossler-attractor" => Ok(SystemKind::Rossler),
            "pendulum" | "double-pendulum" => Ok(SystemKind::DoublePendulum),
            "malkus" | "waterwheel" | "malkus-waterwheel" => Ok(SystemKind::Waterwheel),
            "gyre" | "double-gyre" => Ok(SystemKind::DoubleGyre),
            other => Err(format!("unknown system `{other}`")),
        }
    }
}
