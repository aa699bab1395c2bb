//! Per-system sampling bounds.
//!
//! Every bound is a closed interval drawn uniformly. A degenerate interval
//! (`min == max`) pins the value while still consuming one draw, so fixing a
//! parameter does not shift the random stream for the rest of the sample.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use ndarray::{array, Array1};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use super::InitialConditionSampler;
use crate::error::SimulationError;
use crate::systems::double_pendulum::STANDARD_GRAVITY;
use crate::systems::waterwheel::DEFAULT_BUCKETS;
use crate::systems::{DoubleGyre, DoublePendulum, Lorenz, Rossler, SystemKind, Waterwheel};

/// Closed sampling interval [min, max]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Interval `centre ± half_width`
    pub fn around(centre: f64, half_width: f64) -> Self {
        Self::new(centre - half_width, centre + half_width)
    }

    /// Degenerate interval pinning a value
    pub const fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn validate(&self, name: &str) -> Result<(), SimulationError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(SimulationError::InvalidBound {
                name: name.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Draw one value uniformly from the interval
    pub fn sample<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Result<f64, SimulationError> {
        self.validate(name)?;
        let uniform = Uniform::new_inclusive(self.min, self.max).map_err(|_| {
            SimulationError::InvalidBound {
                name: name.to_string(),
                min: self.min,
                max: self.max,
            }
        })?;
        Ok(uniform.sample(rng))
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

fn ranges(entries: &[(&str, Bound)]) -> BTreeMap<String, Bound> {
    entries
        .iter()
        .map(|(name, bound)| (name.to_string(), *bound))
        .collect()
}

fn validate_all(entries: &[(&str, Bound)]) -> Result<(), SimulationError> {
    entries.iter().try_for_each(|(name, bound)| bound.validate(name))
}

/// Lorenz bounds: state around the attractor, parameters near σ=10, ρ=28, β=8/3
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LorenzBounds {
    pub x: Bound,
    pub y: Bound,
    pub z: Bound,
    pub sigma: Bound,
    pub rho: Bound,
    pub beta: Bound,
}

impl Default for LorenzBounds {
    fn default() -> Self {
        Self {
            x: Bound::new(-10.0, 10.0),
            y: Bound::new(-15.0, 15.0),
            z: Bound::new(0.0, 40.0),
            sigma: Bound::around(10.0, 1.0),
            rho: Bound::around(28.0, 5.0),
            beta: Bound::around(8.0 / 3.0, 0.25),
        }
    }
}

impl LorenzBounds {
    fn entries(&self) -> [(&'static str, Bound); 6] {
        [
            ("x", self.x),
            ("y", self.y),
            ("z", self.z),
            ("sigma", self.sigma),
            ("rho", self.rho),
            ("beta", self.beta),
        ]
    }
}

impl InitialConditionSampler for LorenzBounds {
    type Model = Lorenz;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(Lorenz, Array1<f64>), SimulationError> {
        let state = array![
            self.x.sample("x", rng)?,
            self.y.sample("y", rng)?,
            self.z.sample("z", rng)?,
        ];
        let model = Lorenz::new(
            self.sigma.sample("sigma", rng)?,
            self.rho.sample("rho", rng)?,
            self.beta.sample("beta", rng)?,
        );
        Ok((model, state))
    }

    fn ranges(&self) -> BTreeMap<String, Bound> {
        ranges(&self.entries())
    }

    fn validate(&self) -> Result<(), SimulationError> {
        validate_all(&self.entries())
    }
}

/// Rössler bounds: parameters pinned to the standard chaotic regime, small
/// initial offsets so trajectories start near the attractor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosslerBounds {
    pub x: Bound,
    pub y: Bound,
    pub z: Bound,
    pub a: Bound,
    pub b: Bound,
    pub c: Bound,
}

impl Default for RosslerBounds {
    fn default() -> Self {
        Self {
            x: Bound::new(-1.5, 1.5),
            y: Bound::new(-1.5, 1.5),
            z: Bound::new(0.1, 0.6),
            a: Bound::fixed(0.2),
            b: Bound::fixed(0.2),
            c: Bound::fixed(5.7),
        }
    }
}

impl RosslerBounds {
    fn entries(&self) -> [(&'static str, Bound); 6] {
        [
            ("x", self.x),
            ("y", self.y),
            ("z", self.z),
            ("a", self.a),
            ("b", self.b),
            ("c", self.c),
        ]
    }
}

impl InitialConditionSampler for RosslerBounds {
    type Model = Rossler;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(Rossler, Array1<f64>), SimulationError> {
        let state = array![
            self.x.sample("x", rng)?,
            self.y.sample("y", rng)?,
            self.z.sample("z", rng)?,
        ];
        let model = Rossler::new(
            self.a.sample("a", rng)?,
            self.b.sample("b", rng)?,
            self.c.sample("c", rng)?,
        );
        Ok((model, state))
    }

    fn ranges(&self) -> BTreeMap<String, Bound> {
        ranges(&self.entries())
    }

    fn validate(&self) -> Result<(), SimulationError> {
        validate_all(&self.entries())
    }
}

/// Double pendulum bounds: full angle range, moderate spin, rods and masses
/// within a factor of three of each other
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoublePendulumBounds {
    pub theta: Bound,
    pub omega: Bound,
    pub length: Bound,
    pub mass: Bound,
    pub g: Bound,
}

impl Default for DoublePendulumBounds {
    fn default() -> Self {
        Self {
            theta: Bound::new(-PI, PI),
            omega: Bound::new(-5.0, 5.0),
            length: Bound::new(0.5, 1.5),
            mass: Bound::new(0.5, 1.5),
            g: Bound::fixed(STANDARD_GRAVITY),
        }
    }
}

impl DoublePendulumBounds {
    fn entries(&self) -> [(&'static str, Bound); 5] {
        [
            ("theta", self.theta),
            ("omega", self.omega),
            ("length", self.length),
            ("mass", self.mass),
            ("g", self.g),
        ]
    }
}

impl InitialConditionSampler for DoublePendulumBounds {
    type Model = DoublePendulum;

    fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(DoublePendulum, Array1<f64>), SimulationError> {
        let theta1 = self.theta.sample("theta1", rng)?;
        let theta2 = self.theta.sample("theta2", rng)?;
        let omega1 = self.omega.sample("omega1", rng)?;
        let omega2 = self.omega.sample("omega2", rng)?;

        let model = DoublePendulum::new(
            self.length.sample("l1", rng)?,
            self.length.sample("l2", rng)?,
            self.mass.sample("m1", rng)?,
            self.mass.sample("m2", rng)?,
            self.g.sample("g", rng)?,
        );
        Ok((model, array![theta1, omega1, theta2, omega2]))
    }

    fn ranges(&self) -> BTreeMap<String, Bound> {
        ranges(&[
            ("theta1", self.theta),
            ("theta2", self.theta),
            ("omega1", self.omega),
            ("omega2", self.omega),
            ("l1", self.length),
            ("l2", self.length),
            ("m1", self.mass),
            ("m2", self.mass),
            ("g", self.g),
        ])
    }

    fn validate(&self) -> Result<(), SimulationError> {
        validate_all(&self.entries())
    }
}

/// Waterwheel bounds: slow initial spin, empty buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterwheelBounds {
    pub num_buckets: usize,
    pub omega: Bound,
    pub theta: Bound,
    #[serde(rename = "Q")]
    pub inflow: Bound,
    #[serde(rename = "K")]
    pub leak: Bound,
    #[serde(rename = "nu")]
    pub damping: Bound,
}

impl Default for WaterwheelBounds {
    fn default() -> Self {
        Self {
            num_buckets: DEFAULT_BUCKETS,
            omega: Bound::new(0.01, 0.3),
            theta: Bound::new(0.0, 2.0 * PI),
            inflow: Bound::new(1.5, 3.5),
            leak: Bound::new(0.05, 0.2),
            damping: Bound::new(0.5, 1.5),
        }
    }
}

impl WaterwheelBounds {
    fn entries(&self) -> [(&'static str, Bound); 5] {
        [
            ("omega", self.omega),
            ("theta", self.theta),
            ("Q", self.inflow),
            ("K", self.leak),
            ("nu", self.damping),
        ]
    }
}

impl InitialConditionSampler for WaterwheelBounds {
    type Model = Waterwheel;

    fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(Waterwheel, Array1<f64>), SimulationError> {
        let omega = self.omega.sample("omega", rng)?;
        let theta = self.theta.sample("theta", rng)?;

        let model = Waterwheel::new(
            self.num_buckets,
            self.inflow.sample("Q", rng)?,
            self.leak.sample("K", rng)?,
            self.damping.sample("nu", rng)?,
        );
        let state = model.initial_state(omega, theta);
        Ok((model, state))
    }

    fn ranges(&self) -> BTreeMap<String, Bound> {
        let mut map = ranges(&self.entries());
        map.insert(
            "num_buckets".to_string(),
            Bound::fixed(self.num_buckets as f64),
        );
        map
    }

    fn validate(&self) -> Result<(), SimulationError> {
        if self.num_buckets < 2 {
            return Err(SimulationError::InvalidBound {
                name: "num_buckets".to_string(),
                min: self.num_buckets as f64,
                max: self.num_buckets as f64,
            });
        }
        validate_all(&self.entries())
    }
}

/// Double-gyre bounds: anywhere in the domain, parameters near A=0.1,
/// ε=0.25, ω=0.5
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleGyreBounds {
    pub x: Bound,
    pub y: Bound,
    #[serde(rename = "A")]
    pub amplitude: Bound,
    pub epsilon: Bound,
    pub omega: Bound,
}

impl Default for DoubleGyreBounds {
    fn default() -> Self {
        Self {
            x: Bound::new(0.0, 2.0),
            y: Bound::new(0.0, 1.0),
            amplitude: Bound::around(0.1, 0.025),
            epsilon: Bound::around(0.25, 0.05),
            omega: Bound::around(0.5, 0.15),
        }
    }
}

impl DoubleGyreBounds {
    fn entries(&self) -> [(&'static str, Bound); 5] {
        [
            ("x", self.x),
            ("y", self.y),
            ("A", self.amplitude),
            ("epsilon", self.epsilon),
            ("omega", self.omega),
        ]
    }
}

impl InitialConditionSampler for DoubleGyreBounds {
    type Model = DoubleGyre;

    fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(DoubleGyre, Array1<f64>), SimulationError> {
        let state = array![self.x.sample("x", rng)?, self.y.sample("y", rng)?];
        let model = DoubleGyre::new(
            self.amplitude.sample("A", rng)?,
            self.epsilon.sample("epsilon", rng)?,
            self.omega.sample("omega", rng)?,
        );
        Ok((model, state))
    }

    fn ranges(&self) -> BTreeMap<String, Bound> {
        ranges(&self.entries())
    }

    fn validate(&self) -> Result<(), SimulationError> {
        validate_all(&self.entries())
    }
}

/// Bounds for every system, as read from the `[bounds]` config table
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerBounds {
    pub lorenz: LorenzBounds,
    pub rossler: RosslerBounds,
    pub double_pendulum: DoublePendulumBounds,
    pub waterwheel: WaterwheelBounds,
    pub double_gyre: DoubleGyreBounds,
}

impl SamplerBounds {
    /// Sampling ranges of one system, for dataset metadata
    pub fn ranges_for(&self, system: SystemKind) -> BTreeMap<String, Bound> {
        match system {
            SystemKind::Lorenz => self.lorenz.ranges(),
            SystemKind::Rossler => self.rossler.ranges(),
            SystemKind::DoublePendulum => self.double_pendulum.ranges(),
            SystemKind::Waterwheel => self.waterwheel.ranges(),
            SystemKind::DoubleGyre => self.double_gyre.ranges(),
        }
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        self.lorenz.validate()?;
        self.rossler.validate()?;
        self.double_pendulum.validate()?;
        self.waterwheel.validate()?;
        self.double_gyre.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::DerivativeModel;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_fixed_bound_returns_value() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let value = Bound::fixed(9.81).sample("g", &mut rng).unwrap();
        assert_eq!(value, 9.81);
    }

    #[test]
    fn test_inverted_bound_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = Bound::new(2.0, 1.0).sample("x", &mut rng).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidBound { .. }));
    }

    #[test]
    fn test_lorenz_samples_within_bounds() {
        let bounds = LorenzBounds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..200 {
            let (model, state) = bounds.sample(&mut rng).unwrap();
            assert!(bounds.x.contains(state[0]));
            assert!(bounds.y.contains(state[1]));
            assert!(bounds.z.contains(state[2]));
            assert!(bounds.sigma.contains(model.sigma));
            assert!(bounds.rho.contains(model.rho));
            assert!(bounds.beta.contains(model.beta));
        }
    }

    #[test]
    fn test_pendulum_samples_within_bounds() {
        let bounds = DoublePendulumBounds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..200 {
            let (model, state) = bounds.sample(&mut rng).unwrap();
            assert!(state[0].abs() <= PI && state[2].abs() <= PI);
            assert!(state[1].abs() <= 5.0 && state[3].abs() <= 5.0);
            for value in [model.l1, model.l2, model.m1, model.m2] {
                assert!((0.5..=1.5).contains(&value));
            }
            assert_eq!(model.g, STANDARD_GRAVITY);
        }
    }

    #[test]
    fn test_waterwheel_starts_empty() {
        let bounds = WaterwheelBounds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (model, state) = bounds.sample(&mut rng).unwrap();
        assert_eq!(state.len(), model.dimension());
        assert_eq!(model.bucket_mass_sum(&state), 0.0);
    }

    #[test]
    fn test_same_seed_same_samples() {
        let bounds = DoubleGyreBounds::default();
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);

        for _ in 0..10 {
            let (model_a, state_a) = bounds.sample(&mut a).unwrap();
            let (model_b, state_b) = bounds.sample(&mut b).unwrap();
            assert_eq!(model_a, model_b);
            assert_eq!(state_a, state_b);
        }
    }

    #[test]
    fn test_ranges_cover_parameters() {
        let ranges = DoublePendulumBounds::default().ranges();
        for name in ["theta1", "omega2", "l1", "m2", "g"] {
            assert!(ranges.contains_key(name), "missing {}", name);
        }
        assert!(WaterwheelBounds::default().ranges().contains_key("num_buckets"));
    }

    #[test]
    fn test_config_bounds_validation() {
        let mut bounds = SamplerBounds::default();
        assert!(bounds.validate().is_ok());
        bounds.lorenz.rho = Bound::new(30.0, 20.0);
        assert!(bounds.validate().is_err());
    }
}
