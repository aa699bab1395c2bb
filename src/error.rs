//! Error types shared across the generation pipeline.
//!
//! Numerical failures are scoped to a single trajectory: the batch runner
//! turns a [`SimulationError`] into an abort record and moves on. Dataset and
//! configuration errors are reported to the caller and never retried.

use std::path::PathBuf;

/// Failure while integrating one trajectory.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("coordinate {coordinate} became non-finite ({value}) at step {step}")]
    NonFinite {
        step: usize,
        coordinate: usize,
        value: f64,
    },
    #[error("near-singular configuration at step {step}: |denominator| = {denominator:e}")]
    SingularConfiguration { step: usize, denominator: f64 },
    #[error("state has {actual} coordinates, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("invalid sampling bound for {name}: [{min}, {max}]")]
    InvalidBound { name: String, min: f64, max: f64 },
    #[error("integrator `{integrator}` is not available for {system}")]
    UnsupportedIntegrator {
        integrator: &'static str,
        system: &'static str,
    },
}

impl SimulationError {
    /// Attach the step index to errors raised inside a derivative evaluation,
    /// which has no notion of which step it belongs to.
    pub fn at_step(self, step: usize) -> Self {
        match self {
            SimulationError::NonFinite {
                coordinate, value, ..
            } => SimulationError::NonFinite {
                step,
                coordinate,
                value,
            },
            SimulationError::SingularConfiguration { denominator, .. } => {
                SimulationError::SingularConfiguration { step, denominator }
            }
            other => other,
        }
    }
}

/// Failure reading or writing an exported dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed dataset {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode dataset: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("no dataset files found in {0}")]
    NoDatasets(PathBuf),
    #[error("trajectory {trajectory_id} has no `{field}` value")]
    MissingField {
        trajectory_id: usize,
        field: String,
    },
    #[error("output column {column} is out of range for {width} feature columns")]
    ColumnOutOfRange { column: usize, width: usize },
}

/// Failure loading or validating a generation config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure installing the global tracing subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("tracing has already been initialised")]
    AlreadyInitialised,
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

impl From<SimulationError> for ConfigError {
    fn from(err: SimulationError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}
