//! Physical Systems Module: Chaotic Models for Dataset Synthesis
//!
//! Implements the canonical chaotic systems whose trajectories become
//! training data:
//!
//! - **Lorenz**: Convection rolls, two-winged strange attractor
//! - **Rössler**: Single-lobe spiral chaos
//! - **Double pendulum**: Coupled rigid-rod oscillators
//! - **Malkus waterwheel**: Leaky buckets on a rotating wheel
//! - **Double gyre**: Time-periodic tracer advection
//!
//! Each system is a plain parameter struct implementing [`DerivativeModel`].

mod kind;
mod traits;
mod lorenz;
mod rossler;
pub mod double_pendulum;
pub mod waterwheel;
pub mod double_gyre;

pub use kind::SystemKind;
pub use traits::{DerivativeModel, ParameterSet};
pub use lorenz::Lorenz;
pub use rossler::Rossler;
pub use double_pendulum::DoublePendulum;
pub use waterwheel::{LegacyWaterwheelRk4, Waterwheel};
pub use double_gyre::DoubleGyre;
