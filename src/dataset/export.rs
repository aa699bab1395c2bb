//! JSON dataset documents: export and import.
//!
//! One document is written per generation run and never updated in place.
//! Metadata keys are camelCase; record keys are snake_case.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::samples::Sample;
use super::windower::SequenceWindow;
use crate::error::DatasetError;
use crate::integrator::IntegratorKind;
use crate::sampler::Bound;
use crate::systems::SystemKind;

/// Export format version
pub const FORMAT_VERSION: &str = "1.0";

/// Window geometry recorded in metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowMetadata {
    pub sequence_length: usize,
    pub prediction_horizon: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_columns: Option<Vec<usize>>,
}

/// Everything a consumer needs to interpret the numeric arrays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    /// RFC 3339 generation timestamp
    pub generated: String,
    pub simulator: SystemKind,
    pub version: String,
    pub integrator: IntegratorKind,
    pub seed: u64,
    pub timestep: f64,
    pub steps_per_trajectory: usize,
    pub total_trajectories: usize,
    pub aborted_trajectories: usize,
    pub total_samples: usize,
    pub feature_names: Vec<String>,
    pub label_names: Vec<String>,
    pub parameter_ranges: BTreeMap<String, Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_distribution: Option<BTreeMap<String, usize>>,
    /// First trajectory id not generated when the run was cancelled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_from: Option<usize>,
}

/// Records of a dataset, serialized under `samples` or `windows`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Records {
    Samples(Vec<Sample>),
    Windows(Vec<SequenceWindow>),
}

impl Records {
    pub fn len(&self) -> usize {
        match self {
            Records::Samples(samples) => samples.len(),
            Records::Windows(windows) => windows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One exported generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub metadata: DatasetMetadata,
    #[serde(flatten)]
    pub records: Records,
}

impl Dataset {
    pub fn samples(&self) -> Option<&[Sample]> {
        match &self.records {
            Records::Samples(samples) => Some(samples),
            Records::Windows(_) => None,
        }
    }

    pub fn windows(&self) -> Option<&[SequenceWindow]> {
        match &self.records {
            Records::Windows(windows) => Some(windows),
            Records::Samples(_) => None,
        }
    }
}

/// `<prefix>_dataset_<YYYY-MM-DD>_<unix seconds>.json`
pub fn dataset_file_name(system: SystemKind, at: DateTime<Utc>) -> String {
    format!(
        "{}_dataset_{}_{}.json",
        system.file_prefix(),
        at.format("%Y-%m-%d"),
        at.timestamp()
    )
}

/// Serialize `dataset` to `path`, creating parent directories.
///
/// Returns the number of bytes written.
pub fn write_dataset(dataset: &Dataset, path: &Path, pretty: bool) -> Result<u64, DatasetError> {
    let io_err = |source: std::io::Error| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = fs::File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, dataset).map_err(DatasetError::Encode)?;
    } else {
        serde_json::to_writer(&mut writer, dataset).map_err(DatasetError::Encode)?;
    }
    writer.flush().map_err(io_err)?;

    let size = fs::metadata(path).map_err(io_err)?.len();
    Ok(size)
}

/// Write `dataset` into `dir` under its conventional file name
pub fn export_dataset(
    dataset: &Dataset,
    dir: &Path,
    pretty: bool,
    at: DateTime<Utc>,
) -> Result<(PathBuf, u64), DatasetError> {
    let path = dir.join(dataset_file_name(dataset.metadata.simulator, at));
    let size = write_dataset(dataset, &path, pretty)?;
    Ok((path, size))
}

/// Read one exported document
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let file = fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| DatasetError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every `*.json` document in `dir`, in file-name order
pub fn load_directory(dir: &Path) -> Result<Vec<Dataset>, DatasetError> {
    let io_err = |source: std::io::Error| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(DatasetError::NoDatasets(dir.to_path_buf()));
    }
    paths.sort();

    paths.iter().map(|path| load_dataset(path)).collect()
}
