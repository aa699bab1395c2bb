//! Heuristic behavior classification for double pendulum trajectories.
//!
//! Two statistics feed the decision:
//!
//! - **Half-period mismatch**: mean of |ω₁[i] - ω₁[i+n/2]| + |ω₂[i] - ω₂[i+n/2]|
//!   over the first half of the trajectory, a crude autocorrelation.
//! - **Angle-step spread**: population standard deviation of the absolute
//!   per-step changes |θ[i] - θ[i-1]|, for each angle.
//!
//! Decision, first match wins:
//!
//! | class    | mismatch | spread                |
//! |----------|----------|-----------------------|
//! | periodic | < 3.0    | both < 0.3            |
//! | resonant | < 5.0    | at least one < 0.5    |
//! | chaotic  | otherwise                        |
//!
//! The thresholds are empirical.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const PERIODIC_MISMATCH: f64 = 3.0;
pub const PERIODIC_SPREAD: f64 = 0.3;
pub const RESONANT_MISMATCH: f64 = 5.0;
pub const RESONANT_SPREAD: f64 = 0.5;

/// Trajectories shorter than this are labeled chaotic outright
pub const MIN_POINTS: usize = 10;

/// Qualitative behavior class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorClass {
    Periodic,
    Chaotic,
    Resonant,
}

impl BehaviorClass {
    /// Class names in the fixed label order used by exported datasets
    pub const ALL: [BehaviorClass; 3] = [
        BehaviorClass::Periodic,
        BehaviorClass::Chaotic,
        BehaviorClass::Resonant,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BehaviorClass::Periodic => "periodic",
            BehaviorClass::Chaotic => "chaotic",
            BehaviorClass::Resonant => "resonant",
        }
    }

    /// Position in [`BehaviorClass::ALL`] (one-hot index)
    pub fn index(&self) -> usize {
        match self {
            BehaviorClass::Periodic => 0,
            BehaviorClass::Chaotic => 1,
            BehaviorClass::Resonant => 2,
        }
    }
}

impl fmt::Display for BehaviorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BehaviorClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "periodic" => Ok(BehaviorClass::Periodic),
            "chaotic" => Ok(BehaviorClass::Chaotic),
            "resonant" => Ok(BehaviorClass::Resonant),
            other => Err(format!("unknown behavior class `{other}`")),
        }
    }
}

/// Summary statistics behind a classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorStatistics {
    pub half_period_mismatch: f64,
    pub theta1_step_std: f64,
    pub theta2_step_std: f64,
}

impl BehaviorStatistics {
    pub fn class(&self) -> BehaviorClass {
        let m = self.half_period_mismatch;
        let (s1, s2) = (self.theta1_step_std, self.theta2_step_std);

        if m < PERIODIC_MISMATCH && s1 < PERIODIC_SPREAD && s2 < PERIODIC_SPREAD {
            BehaviorClass::Periodic
        } else if m < RESONANT_MISMATCH && (s1 < RESONANT_SPREAD || s2 < RESONANT_SPREAD) {
            BehaviorClass::Resonant
        } else {
            BehaviorClass::Chaotic
        }
    }
}

fn absolute_steps(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| (w[1] - w[0]).abs()).collect()
}

/// Population standard deviation (0 for an empty slice)
fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Compute the statistics, or `None` for trajectories under [`MIN_POINTS`]
pub fn behavior_statistics(
    theta1: &[f64],
    omega1: &[f64],
    theta2: &[f64],
    omega2: &[f64],
) -> Option<BehaviorStatistics> {
    let n = theta1
        .len()
        .min(omega1.len())
        .min(theta2.len())
        .min(omega2.len());
    if n < MIN_POINTS {
        return None;
    }

    let mid = n / 2;
    let mismatch = (0..mid)
        .map(|i| (omega1[i] - omega1[i + mid]).abs() + (omega2[i] - omega2[i + mid]).abs())
        .sum::<f64>()
        / mid as f64;

    Some(BehaviorStatistics {
        half_period_mismatch: mismatch,
        theta1_step_std: population_std(&absolute_steps(&theta1[..n])),
        theta2_step_std: population_std(&absolute_steps(&theta2[..n])),
    })
}

/// Classify a trajectory given its angle and angular-velocity series
pub fn classify_behavior(
    theta1: &[f64],
    omega1: &[f64],
    theta2: &[f64],
    omega2: &[f64],
) -> BehaviorClass {
    behavior_statistics(theta1, omega1, theta2, omega2)
        .map(|stats| stats.class())
        .unwrap_or(BehaviorClass::Chaotic)
}
