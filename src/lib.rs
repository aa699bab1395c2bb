//! # chaos-synth
//!
//! Labeled Time-Series Datasets from Canonical Chaotic Systems
//!
//! ## Overview
//!
//! This crate integrates the equations of motion of five chaotic systems
//! from randomized initial conditions and packages the resulting
//! trajectories as supervised training data:
//!
//! - **Lorenz attractor**: dx=σ(y−x), dy=x(ρ−z)−y, dz=xy−βz
//! - **Rössler attractor**: dx=−y−z, dy=x+ay, dz=b+z(x−c)
//! - **Double pendulum**: Lagrangian two-rod dynamics (θ₁, ω₁, θ₂, ω₂)
//! - **Malkus waterwheel**: leaky buckets driving a damped wheel
//! - **Double gyre**: time-periodic tracer advection on [0,2]×[0,1]
//!
//! ### Pipeline
//!
//! ```text
//! Sampler ──▶ TrajectoryGenerator ──▶ Diagnostics ──▶ Windower ──▶ Exporter
//! (seeded)     (RK4 / Euler steps)     (energy,        (samples,     (JSON
//!                                       Lyapunov,       windows)      document)
//!                                       behavior)
//! ```
//!
//! 1. **Sampling**: parameters and initial state drawn uniformly within
//!    per-system bounds, one ChaCha8 stream per trajectory
//! 2. **Integration**: fixed-step RK4 or explicit Euler, boundary handling
//!    after each step, abort on the first non-finite coordinate
//! 3. **Diagnostics**: energy drift, a single-trajectory Lyapunov proxy and
//!    a periodic / chaotic / resonant behavior class
//! 4. **Windowing**: next-step samples, classification samples, or
//!    fixed-horizon (input, output) sequence windows
//!
//! ## Reproducibility
//!
//! Given the same seed, configuration and trajectory id, generation is
//! bit-identical regardless of the number of worker threads.

pub mod batch;
pub mod config;
pub mod dataset;
pub mod diagnostics;
pub mod error;
pub mod integrator;
pub mod sampler;
pub mod systems;
pub mod telemetry;
pub mod trajectory;

// Re-exports from systems
pub use systems::{
    DerivativeModel,
    DoubleGyre,
    DoublePendulum,
    LegacyWaterwheelRk4,
    Lorenz,
    ParameterSet,
    Rossler,
    SystemKind,
    Waterwheel,
};

// Re-exports from integrator
pub use integrator::{Euler, IntegratorKind, Rk4, Stepper};

// Re-exports from sampler
pub use sampler::{trajectory_rng, Bound, InitialConditionSampler, SamplerBounds};

// Re-exports from trajectory
pub use trajectory::{AnnotatedTrajectory, Trajectory, TrajectoryGenerator, TrajectoryPoint};

// Re-exports from diagnostics
pub use diagnostics::{BehaviorClass, TrajectoryDiagnostics};

// Re-exports from dataset
pub use dataset::{
    Dataset,
    DatasetMetadata,
    DatasetSchema,
    Sample,
    SequenceWindow,
    WindowConfig,
};

// Re-exports from batch / config
pub use batch::{assemble_dataset, run_batch, run_system, AbortRecord, BatchConfig, BatchReport};
pub use config::{GenerationConfig, OutputMode};

pub use error::{ConfigError, DatasetError, SimulationError, TelemetryError};
