//! Batch generation over many initial conditions.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{AbortRecord, BatchConfig, BatchReport};
use crate::error::SimulationError;
use crate::integrator::{Euler, IntegratorKind, Rk4, Stepper};
use crate::sampler::{trajectory_rng, InitialConditionSampler, SamplerBounds};
use crate::systems::{DerivativeModel, LegacyWaterwheelRk4, ParameterSet, SystemKind};
use crate::trajectory::{AnnotatedTrajectory, TrajectoryGenerator};

/// Result of attempting one trajectory
enum Outcome {
    Completed(AnnotatedTrajectory),
    Aborted(AbortRecord),
    Skipped(usize),
}

fn run_one<S, St>(id: usize, config: &BatchConfig, sampler: &S, stepper: &St) -> Outcome
where
    S: InitialConditionSampler,
    St: Stepper<S::Model>,
{
    let mut rng = trajectory_rng(config.seed, id);
    let (model, initial) = match sampler.sample(&mut rng) {
        Ok(sample) => sample,
        Err(error) => {
            warn!(trajectory_id = id, %error, "sampling failed, trajectory aborted");
            return Outcome::Aborted(AbortRecord {
                trajectory_id: id,
                initial_state: Vec::new(),
                parameters: ParameterSet::new(),
                error,
            });
        }
    };

    let generator = TrajectoryGenerator::new(config.steps, config.dt);
    match generator.generate(id, &model, stepper, initial.clone()) {
        Ok(trajectory) => {
            let diagnostics = model.annotate(&trajectory);
            Outcome::Completed(AnnotatedTrajectory {
                trajectory,
                diagnostics,
            })
        }
        Err(error) => {
            let parameters = model.parameters();
            warn!(
                trajectory_id = id,
                system = %model.kind(),
                initial_state = ?initial.as_slice(),
                parameters = ?parameters,
                %error,
                "trajectory aborted"
            );
            Outcome::Aborted(AbortRecord {
                trajectory_id: id,
                initial_state: initial.to_vec(),
                parameters,
                error,
            })
        }
    }
}

fn attempt<S, St>(
    id: usize,
    config: &BatchConfig,
    sampler: &S,
    stepper: &St,
    cancel: &AtomicBool,
) -> Outcome
where
    S: InitialConditionSampler,
    St: Stepper<S::Model>,
{
    if cancel.load(Ordering::Relaxed) {
        return Outcome::Skipped(id);
    }
    run_one(id, config, sampler, stepper)
}

fn run_parallel<S, St>(
    config: &BatchConfig,
    sampler: &S,
    stepper: &St,
    cancel: &AtomicBool,
) -> Option<Vec<Outcome>>
where
    S: InitialConditionSampler + Sync,
    St: Stepper<S::Model> + Sync,
{
    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
    {
        Ok(pool) => pool,
        Err(error) => {
            warn!(workers = config.workers, %error, "worker pool unavailable, running sequentially");
            return None;
        }
    };

    // Each worker owns its outcomes; rayon's indexed collect restores id order.
    Some(pool.install(|| {
        config
            .ids()
            .into_par_iter()
            .map(|id| attempt(id, config, sampler, stepper, cancel))
            .collect()
    }))
}

fn run_sequential<S, St>(
    config: &BatchConfig,
    sampler: &S,
    stepper: &St,
    cancel: &AtomicBool,
) -> Vec<Outcome>
where
    S: InitialConditionSampler,
    St: Stepper<S::Model>,
{
    let mut outcomes = Vec::with_capacity(config.trajectories);
    for id in config.ids() {
        let outcome = attempt(id, config, sampler, stepper, cancel);
        let stop = matches!(outcome, Outcome::Skipped(_));
        outcomes.push(outcome);
        if stop {
            break;
        }
        debug!(trajectory_id = id, total = config.trajectories, "progress");
    }
    outcomes
}

/// Generate every trajectory of a batch with one sampler and one step policy.
///
/// Aborted trajectories are recorded and skipped. `cancel` is checked before
/// each trajectory starts; a trajectory already running always finishes.
/// With several workers, ids above [`BatchReport::resume_from`] may already
/// be complete; regenerating them yields identical trajectories.
pub fn run_batch<S, St>(
    config: &BatchConfig,
    sampler: &S,
    stepper: &St,
    cancel: &AtomicBool,
) -> Result<BatchReport, SimulationError>
where
    S: InitialConditionSampler + Sync,
    St: Stepper<S::Model> + Sync,
{
    sampler.validate()?;

    let parallel = if config.workers > 1 {
        run_parallel(config, sampler, stepper, cancel)
    } else {
        None
    };
    let outcomes = match parallel {
        Some(outcomes) => outcomes,
        None => run_sequential(config, sampler, stepper, cancel),
    };

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Completed(trajectory) => report.trajectories.push(trajectory),
            Outcome::Aborted(record) => report.aborted.push(record),
            Outcome::Skipped(id) => {
                report.cancelled = true;
                report.resume_from = Some(report.resume_from.map_or(id, |r| r.min(id)));
            }
        }
    }

    let summary = report.summary();
    info!(
        requested = config.trajectories,
        completed = summary.completed,
        aborted = summary.aborted,
        cancelled = summary.cancelled,
        resume_from = ?summary.resume_from,
        integrator = stepper.name(),
        "batch finished"
    );
    Ok(report)
}

fn run_standard<S>(
    system: SystemKind,
    integrator: IntegratorKind,
    config: &BatchConfig,
    sampler: &S,
    cancel: &AtomicBool,
) -> Result<BatchReport, SimulationError>
where
    S: InitialConditionSampler + Sync,
{
    match integrator {
        IntegratorKind::Rk4 => run_batch(config, sampler, &Rk4, cancel),
        IntegratorKind::Euler => run_batch(config, sampler, &Euler, cancel),
        IntegratorKind::LegacyRk4 => Err(SimulationError::UnsupportedIntegrator {
            integrator: integrator.name(),
            system: system.id(),
        }),
    }
}

/// Run a batch for `system`, picking the sampler from `bounds`
pub fn run_system(
    system: SystemKind,
    integrator: IntegratorKind,
    config: &BatchConfig,
    bounds: &SamplerBounds,
    cancel: &AtomicBool,
) -> Result<BatchReport, SimulationError> {
    match system {
        SystemKind::Lorenz => run_standard(system, integrator, config, &bounds.lorenz, cancel),
        SystemKind::Rossler => run_standard(system, integrator, config, &bounds.rossler, cancel),
        SystemKind::DoublePendulum => {
            run_standard(system, integrator, config, &bounds.double_pendulum, cancel)
        }
        SystemKind::DoubleGyre => {
            run_standard(system, integrator, config, &bounds.double_gyre, cancel)
        }
        SystemKind::Waterwheel => match integrator {
            IntegratorKind::LegacyRk4 => {
                run_batch(config, &bounds.waterwheel, &LegacyWaterwheelRk4, cancel)
            }
            _ => run_standard(system, integrator, config, &bounds.waterwheel, cancel),
        },
    }
}
