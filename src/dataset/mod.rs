//! Dataset Module: Windowing and Export
//!
//! Turns annotated trajectories into training records and serializes them.
//!
//! ```text
//! AnnotatedTrajectory ──▶ DatasetSchema::feature_rows ──┬─▶ next_step_samples
//!                                                       ├─▶ classification_samples
//!                                                       └─▶ windows_from_rows
//!                                                                │
//!                          Dataset { metadata, records } ◀───────┘
//! ```
//!
//! Exported documents can be read back with [`load_dataset`] /
//! [`load_directory`] and re-windowed with [`windows_from_samples`].

mod export;
mod samples;
mod schema;
mod windower;

pub use export::{
    dataset_file_name, export_dataset, load_dataset, load_directory, write_dataset, Dataset,
    DatasetMetadata, Records, WindowMetadata, FORMAT_VERSION,
};
pub use samples::{classification_samples, next_step_samples, Sample, SampleMetadata};
pub use schema::{DatasetSchema, Feature, FeatureSource};
pub use windower::{
    windows_from_rows, windows_from_samples, windows_from_trajectory, SequenceWindow,
    WindowConfig,
};
