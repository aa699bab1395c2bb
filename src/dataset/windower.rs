//! Fixed-horizon sequence windowing.
//!
//! For a trajectory of `n` feature rows, sequence length `L` and prediction
//! horizon `H`, one window starts at every index `i` in `[0, n - L - H)`:
//!
//! ```text
//!   rows:   r₀ r₁ … r_i … r_{i+L-1} | r_{i+L} … r_{i+L+H-1} … r_{n-1}
//!                 └──── input ────┘   └───── output ─────┘
//! ```
//!
//! The window count is `max(0, n - L - H)`. Start index `n - L - H` is not
//! emitted even though its window would fit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::samples::Sample;
use super::schema::DatasetSchema;
use crate::error::DatasetError;
use crate::trajectory::AnnotatedTrajectory;

/// Window geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub sequence_length: usize,
    pub prediction_horizon: usize,
    /// Feature columns kept in the output slice; all columns when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_columns: Option<Vec<usize>>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            sequence_length: 50,
            prediction_horizon: 10,
            output_columns: None,
        }
    }
}

impl WindowConfig {
    pub fn new(sequence_length: usize, prediction_horizon: usize) -> Self {
        Self {
            sequence_length,
            prediction_horizon,
            output_columns: None,
        }
    }

    pub fn with_output_columns(mut self, columns: Vec<usize>) -> Self {
        self.output_columns = Some(columns);
        self
    }

    /// Number of windows a trajectory of `num_steps` rows produces
    pub fn window_count(&self, num_steps: usize) -> usize {
        let span = self.sequence_length.saturating_add(self.prediction_horizon);
        num_steps.saturating_sub(span)
    }

    /// Check `output_columns` against a row width
    pub fn check_columns(&self, width: usize) -> Result<(), DatasetError> {
        match self
            .output_columns
            .iter()
            .flatten()
            .find(|&&column| column >= width)
        {
            Some(&column) => Err(DatasetError::ColumnOutOfRange { column, width }),
            None => Ok(()),
        }
    }
}

/// One (input, output) training pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceWindow {
    pub trajectory_id: usize,
    /// Start index of the input slice
    pub timestep: usize,
    pub input: Vec<Vec<f64>>,
    pub output: Vec<Vec<f64>>,
}

/// Slice ordered feature rows of one trajectory into windows
pub fn windows_from_rows(
    trajectory_id: usize,
    rows: &[Vec<f64>],
    config: &WindowConfig,
) -> Result<Vec<SequenceWindow>, DatasetError> {
    let count = config.window_count(rows.len());
    if count == 0 {
        info!(
            trajectory_id,
            rows = rows.len(),
            sequence_length = config.sequence_length,
            prediction_horizon = config.prediction_horizon,
            "trajectory too short for windowing, skipped"
        );
        return Ok(Vec::new());
    }
    if let Some(first) = rows.first() {
        config.check_columns(first.len())?;
    }

    let (l, h) = (config.sequence_length, config.prediction_horizon);
    let project = |row: &Vec<f64>| -> Vec<f64> {
        match &config.output_columns {
            Some(columns) => columns.iter().map(|&c| row[c]).collect(),
            None => row.clone(),
        }
    };

    Ok((0..count)
        .map(|i| SequenceWindow {
            trajectory_id,
            timestep: i,
            input: rows[i..i + l].to_vec(),
            output: rows[i + l..i + l + h].iter().map(project).collect(),
        })
        .collect())
}

/// Windows for one freshly generated trajectory
pub fn windows_from_trajectory(
    schema: &DatasetSchema,
    annotated: &AnnotatedTrajectory,
    config: &WindowConfig,
) -> Result<Vec<SequenceWindow>, DatasetError> {
    let rows = schema.feature_rows(&annotated.trajectory, &annotated.diagnostics)?;
    windows_from_rows(annotated.trajectory.id, &rows, config)
}

/// Windows from previously exported samples.
///
/// Samples are grouped by `trajectory_id` and ordered by `timestep` within
/// each group, so the input order of `samples` does not matter. Groups are
/// emitted in ascending id order.
pub fn windows_from_samples(
    samples: &[Sample],
    config: &WindowConfig,
) -> Result<Vec<SequenceWindow>, DatasetError> {
    let mut groups: BTreeMap<usize, Vec<&Sample>> = BTreeMap::new();
    for sample in samples {
        groups.entry(sample.trajectory_id).or_default().push(sample);
    }

    let mut windows = Vec::new();
    for (trajectory_id, mut group) in groups {
        group.sort_by_key(|s| s.timestep);
        let rows: Vec<Vec<f64>> = group.iter().map(|s| s.features.clone()).collect();
        windows.extend(windows_from_rows(trajectory_id, &rows, config)?);
    }
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize, width: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|i| (0..width).map(|c| (i * 10 + c) as f64).collect())
            .collect()
    }

    fn sample(trajectory_id: usize, timestep: usize) -> Sample {
        Sample {
            trajectory_id,
            timestep,
            time: timestep as f64,
            features: vec![timestep as f64, trajectory_id as f64],
            labels: None,
            label: None,
            metadata: None,
        }
    }

    #[test]
    fn test_window_count() {
        let config = WindowConfig::new(50, 10);
        assert_eq!(config.window_count(200), 140);
        assert_eq!(config.window_count(60), 0);
        assert_eq!(config.window_count(61), 1);
        assert_eq!(config.window_count(10), 0);
    }

    #[test]
    fn test_oversized_geometry_yields_nothing() {
        let config = WindowConfig::new(usize::MAX, 10);
        assert_eq!(config.window_count(200), 0);
        assert_eq!(WindowConfig::new(3, usize::MAX).window_count(usize::MAX), 0);
        assert!(windows_from_rows(0, &rows(30, 2), &config).unwrap().is_empty());
    }

    #[test]
    fn test_windows_match_count_and_slices() {
        let config = WindowConfig::new(4, 2);
        let data = rows(20, 3);
        let windows = windows_from_rows(7, &data, &config).unwrap();

        assert_eq!(windows.len(), 14);
        let w = &windows[3];
        assert_eq!(w.trajectory_id, 7);
        assert_eq!(w.timestep, 3);
        assert_eq!(w.input, data[3..7].to_vec());
        assert_eq!(w.output, data[7..9].to_vec());
    }

    #[test]
    fn test_short_trajectory_yields_nothing() {
        let config = WindowConfig::new(50, 10);
        assert!(windows_from_rows(0, &rows(60, 2), &config).unwrap().is_empty());
        assert!(windows_from_rows(0, &[], &config).unwrap().is_empty());
    }

    #[test]
    fn test_output_columns_projection() {
        let config = WindowConfig::new(3, 2).with_output_columns(vec![0, 1]);
        let data = rows(10, 7);
        let windows = windows_from_rows(0, &data, &config).unwrap();

        assert_eq!(windows[0].input[0].len(), 7);
        assert_eq!(windows[0].output, vec![vec![30.0, 31.0], vec![40.0, 41.0]]);
    }

    #[test]
    fn test_output_column_out_of_range() {
        let config = WindowConfig::new(3, 2).with_output_columns(vec![0, 9]);
        let err = windows_from_rows(0, &rows(10, 7), &config).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ColumnOutOfRange { column: 9, width: 7 }
        ));
    }

    #[test]
    fn test_samples_grouped_and_sorted() {
        // Two trajectories, interleaved and shuffled
        let mut samples = Vec::new();
        for t in (0..8).rev() {
            samples.push(sample(1, t));
            samples.push(sample(0, t));
        }
        let config = WindowConfig::new(3, 2);
        let windows = windows_from_samples(&samples, &config).unwrap();

        assert_eq!(windows.len(), 6);
        assert!(windows[..3].iter().all(|w| w.trajectory_id == 0));
        assert!(windows[3..].iter().all(|w| w.trajectory_id == 1));
        let timesteps: Vec<f64> = windows[0].input.iter().map(|r| r[0]).collect();
        assert_eq!(timesteps, vec![0.0, 1.0, 2.0]);
    }
}
