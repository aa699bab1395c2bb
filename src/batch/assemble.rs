//! Turning a batch report into an exportable dataset.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use super::BatchReport;
use crate::config::{GenerationConfig, OutputMode};
use crate::dataset::{
    classification_samples, next_step_samples, windows_from_trajectory, Dataset,
    DatasetMetadata, DatasetSchema, Records, WindowMetadata, FORMAT_VERSION,
};
use crate::diagnostics::BehaviorClass;
use crate::error::DatasetError;
use crate::trajectory::AnnotatedTrajectory;

/// Behavior class counts over trajectories, every class listed
pub fn label_distribution(trajectories: &[AnnotatedTrajectory]) -> BTreeMap<String, usize> {
    let classes: Vec<BehaviorClass> = trajectories
        .iter()
        .filter_map(|t| t.diagnostics.behavior)
        .collect();
    if classes.is_empty() {
        return BTreeMap::new();
    }

    let mut counts: BTreeMap<String, usize> = BehaviorClass::ALL
        .iter()
        .map(|c| (c.name().to_string(), 0))
        .collect();
    for class in classes {
        *counts.entry(class.name().to_string()).or_default() += 1;
    }
    counts
}

/// Build the dataset document for a finished batch
pub fn assemble_dataset(
    config: &GenerationConfig,
    report: &BatchReport,
    generated: DateTime<Utc>,
) -> Result<Dataset, DatasetError> {
    let schema = DatasetSchema::for_system(config.system);

    let (records, label_names) = match config.mode {
        OutputMode::NextStep => {
            let mut samples = Vec::new();
            for annotated in &report.trajectories {
                samples.extend(next_step_samples(&schema, annotated)?);
            }
            (Records::Samples(samples), schema.next_step_label_names())
        }
        OutputMode::Classification => {
            let mut samples = Vec::new();
            for annotated in &report.trajectories {
                samples.extend(classification_samples(&schema, annotated)?);
            }
            (Records::Samples(samples), schema.class_label_names())
        }
        OutputMode::Windows => {
            let mut windows = Vec::new();
            for annotated in &report.trajectories {
                windows.extend(windows_from_trajectory(&schema, annotated, &config.window)?);
            }
            let labels = match &config.window.output_columns {
                Some(columns) => {
                    let names = schema.feature_names();
                    columns
                        .iter()
                        .map(|&c| {
                            names.get(c).cloned().ok_or(DatasetError::ColumnOutOfRange {
                                column: c,
                                width: names.len(),
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?
                }
                None => schema.feature_names(),
            };
            (Records::Windows(windows), labels)
        }
    };

    let window = (config.mode == OutputMode::Windows).then(|| WindowMetadata {
        sequence_length: config.window.sequence_length,
        prediction_horizon: config.window.prediction_horizon,
        output_columns: config.window.output_columns.clone(),
    });
    let distribution = label_distribution(&report.trajectories);

    Ok(Dataset {
        metadata: DatasetMetadata {
            generated: generated.to_rfc3339_opts(SecondsFormat::Secs, true),
            simulator: config.system,
            version: FORMAT_VERSION.to_string(),
            integrator: config.integrator_kind(),
            seed: config.seed,
            timestep: config.timestep(),
            steps_per_trajectory: config.steps,
            total_trajectories: report.trajectories.len(),
            aborted_trajectories: report.aborted.len(),
            total_samples: records.len(),
            feature_names: schema.feature_names(),
            label_names,
            parameter_ranges: config.bounds.ranges_for(config.system),
            window,
            label_distribution: (!distribution.is_empty()).then_some(distribution),
            resume_from: report.resume_from,
        },
        records,
    })
}
