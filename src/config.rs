//! Generation configuration.
//!
//! A run is described by one TOML document; every key is optional:
//!
//! ```toml
//! system = "double-pendulum"
//! trajectories = 100
//! steps = 200
//! seed = 42
//! mode = "classification"
//!
//! [window]
//! sequence_length = 50
//! prediction_horizon = 10
//!
//! [bounds.double_pendulum]
//! omega = { min = -3.0, max = 3.0 }
//! ```
//!
//! `dt` and `integrator` fall back to per-system defaults when omitted.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::batch::BatchConfig;
use crate::dataset::WindowConfig;
use crate::error::ConfigError;
use crate::integrator::IntegratorKind;
use crate::sampler::SamplerBounds;
use crate::systems::SystemKind;

/// What kind of records a run exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// One sample per point, labeled with the next state
    #[default]
    NextStep,
    /// One sample per point, labeled with the trajectory's behavior class
    Classification,
    /// Fixed-horizon (input, output) sequence windows
    Windows,
}

impl OutputMode {
    pub fn name(&self) -> &'static str {
        match self {
            OutputMode::NextStep => "next-step",
            OutputMode::Classification => "classification",
            OutputMode::Windows => "windows",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next-step" | "next_step" | "nextstep" => Ok(OutputMode::NextStep),
            "classification" | "classify" => Ok(OutputMode::Classification),
            "windows" | "sequences" => Ok(OutputMode::Windows),
            other => Err(format!("unknown output mode `{other}`")),
        }
    }
}

/// One dataset generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    pub system: SystemKind,
    pub trajectories: usize,
    pub steps: usize,
    /// Time step; the system default when `None`
    pub dt: Option<f64>,
    pub seed: u64,
    /// Step policy; the system default when `None`
    pub integrator: Option<IntegratorKind>,
    /// Worker threads; 0 or 1 runs sequentially
    pub workers: usize,
    pub output_dir: PathBuf,
    pub pretty: bool,
    pub mode: OutputMode,
    pub window: WindowConfig,
    pub bounds: SamplerBounds,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            system: SystemKind::Lorenz,
            trajectories: 100,
            steps: 200,
            dt: None,
            seed: 42,
            integrator: None,
            workers: 0,
            output_dir: PathBuf::from("datasets"),
            pretty: false,
            mode: OutputMode::NextStep,
            window: WindowConfig::default(),
            bounds: SamplerBounds::default(),
        }
    }
}

impl GenerationConfig {
    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = raw.parse()?;
        Ok(config)
    }

    /// Effective time step
    pub fn timestep(&self) -> f64 {
        self.dt.unwrap_or_else(|| self.system.default_dt())
    }

    /// Effective step policy
    pub fn integrator_kind(&self) -> IntegratorKind {
        self.integrator
            .unwrap_or_else(|| self.system.default_integrator())
    }

    pub fn batch(&self) -> BatchConfig {
        BatchConfig {
            trajectories: self.trajectories,
            steps: self.steps,
            dt: self.timestep(),
            seed: self.seed,
            workers: self.workers,
            first_id: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::Invalid("steps must be at least 1".into()));
        }
        let dt = self.timestep();
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "dt must be positive and finite, got {dt}"
            )));
        }
        if self.integrator_kind() == IntegratorKind::LegacyRk4
            && self.system != SystemKind::Waterwheel
        {
            return Err(ConfigError::Invalid(format!(
                "integrator `legacy-rk4` is only available for {}",
                SystemKind::Waterwheel
            )));
        }
        if self.mode == OutputMode::Classification && !self.system.supports_classification() {
            return Err(ConfigError::Invalid(format!(
                "classification mode is not available for {}",
                self.system
            )));
        }
        if self.mode == OutputMode::Windows
            && (self.window.sequence_length == 0 || self.window.prediction_horizon == 0)
        {
            return Err(ConfigError::Invalid(
                "sequence_length and prediction_horizon must be at least 1".into(),
            ));
        }
        self.bounds.validate()?;
        Ok(())
    }
}

impl FromStr for GenerationConfig {
    type Err = ConfigError;

    /// Parse and validate a TOML document
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::Bound;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config: GenerationConfig = "".parse().unwrap();
        assert_eq!(config, GenerationConfig::default());
        assert_eq!(config.timestep(), 0.01);
        assert_eq!(config.integrator_kind(), IntegratorKind::Rk4);
    }

    #[test]
    fn test_full_document() {
        let config: GenerationConfig = r#"
            system = "malkus-waterwheel"
            trajectories = 5
            steps = 300
            dt = 0.005
            seed = 7
            integrator = "legacy-rk4"
            workers = 4
            output_dir = "out"
            mode = "windows"

            [window]
            sequence_length = 20
            prediction_horizon = 5
            output_columns = [0, 1]

            [bounds.waterwheel]
            num_buckets = 12
            Q = { min = 2.0, max = 3.0 }
        "#
        .parse()
        .unwrap();

        assert_eq!(config.system, SystemKind::Waterwheel);
        assert_eq!(config.integrator_kind(), IntegratorKind::LegacyRk4);
        assert_eq!(config.mode, OutputMode::Windows);
        assert_eq!(config.window.output_columns, Some(vec![0, 1]));
        assert_eq!(config.bounds.waterwheel.num_buckets, 12);
        assert_eq!(config.bounds.waterwheel.inflow, Bound::new(2.0, 3.0));
        // Untouched bounds keep their defaults
        assert_eq!(config.bounds.waterwheel.leak, Bound::new(0.05, 0.2));
        assert_eq!(config.batch().dt, 0.005);
    }

    #[test]
    fn test_gyre_defaults() {
        let config: GenerationConfig = r#"system = "double-gyre""#.parse().unwrap();
        assert_eq!(config.timestep(), 0.02);
        assert_eq!(config.integrator_kind(), IntegratorKind::Euler);
    }

    #[test]
    fn test_rejections() {
        let cases = [
            "steps = 0",
            "dt = -0.01",
            r#"integrator = "legacy-rk4""#,
            r#"mode = "classification""#,
            "[bounds.lorenz]\nrho = { min = 30.0, max = 20.0 }",
        ];
        for case in cases {
            let err = case.parse::<GenerationConfig>().unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{case}: {err}");
        }
    }

    #[test]
    fn test_unknown_key_is_a_parse_error() {
        let err = "trajectorys = 3".parse::<GenerationConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, "system = \"double-pendulum\"\nmode = \"classification\"\n").unwrap();

        let config = GenerationConfig::load(&path).unwrap();
        assert_eq!(config.system, SystemKind::DoublePendulum);
        assert!(matches!(
            GenerationConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
