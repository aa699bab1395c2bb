//! Per-point training samples.
//!
//! Two labelings are supported:
//!
//! - **Next step**: the label of point `i` is the state of point `i + 1`. The
//!   final point is labeled with its own state (boundary duplication).
//! - **Classification**: every point carries the trajectory's behavior class.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::schema::DatasetSchema;
use crate::diagnostics::{BehaviorClass, TrajectoryDiagnostics};
use crate::error::DatasetError;
use crate::trajectory::{AnnotatedTrajectory, Trajectory};

/// Trajectory-level context attached to classification samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleMetadata {
    /// Initial coordinates and parameters by name
    pub initial_conditions: BTreeMap<String, f64>,
    pub energy_drift: f64,
    pub lyapunov: f64,
}

/// One training record derived from one trajectory point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub trajectory_id: usize,
    pub timestep: usize,
    pub time: f64,
    pub features: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<BehaviorClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SampleMetadata>,
}

/// Next-step samples for one trajectory
pub fn next_step_samples(
    schema: &DatasetSchema,
    annotated: &AnnotatedTrajectory,
) -> Result<Vec<Sample>, DatasetError> {
    let trajectory = &annotated.trajectory;
    let rows = schema.feature_rows(trajectory, &annotated.diagnostics)?;
    let label_indices = schema.next_state_indices(trajectory)?;
    let last = trajectory.len().saturating_sub(1);

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, features)| {
            let target = &trajectory.points[(i + 1).min(last)].state;
            Sample {
                trajectory_id: trajectory.id,
                timestep: i,
                time: trajectory.points[i].time,
                features,
                labels: Some(label_indices.iter().map(|&c| target[c]).collect()),
                label: None,
                metadata: None,
            }
        })
        .collect())
}

fn missing(trajectory: &Trajectory, field: &str) -> DatasetError {
    DatasetError::MissingField {
        trajectory_id: trajectory.id,
        field: field.to_string(),
    }
}

fn sample_metadata(
    trajectory: &Trajectory,
    diagnostics: &TrajectoryDiagnostics,
) -> Result<SampleMetadata, DatasetError> {
    let initial_conditions = trajectory
        .coordinate_names
        .iter()
        .cloned()
        .zip(trajectory.initial_state.iter().copied())
        .chain(
            trajectory
                .parameters
                .iter()
                .map(|(name, value)| (name.to_string(), value)),
        )
        .collect();

    Ok(SampleMetadata {
        initial_conditions,
        energy_drift: diagnostics
            .energy_drift
            .ok_or_else(|| missing(trajectory, "energy_drift"))?,
        lyapunov: diagnostics
            .lyapunov
            .ok_or_else(|| missing(trajectory, "lyapunov"))?,
    })
}

/// Classification samples: every point labeled with the trajectory's class
pub fn classification_samples(
    schema: &DatasetSchema,
    annotated: &AnnotatedTrajectory,
) -> Result<Vec<Sample>, DatasetError> {
    let trajectory = &annotated.trajectory;
    let diagnostics = &annotated.diagnostics;
    let class = diagnostics
        .behavior
        .ok_or_else(|| missing(trajectory, "behavior"))?;
    let metadata = sample_metadata(trajectory, diagnostics)?;
    let rows = schema.feature_rows(trajectory, diagnostics)?;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, features)| Sample {
            trajectory_id: trajectory.id,
            timestep: i,
            time: trajectory.points[i].time,
            features,
            labels: None,
            label: Some(class),
            metadata: Some(metadata.clone()),
        })
        .collect())
}
