//! Chaotic-System Dataset Generation
//!
//! Generates one dataset for one system and writes it as a JSON document:
//!
//! ```text
//! chaos_generate --system double-pendulum --mode classification \
//!     --trajectories 100 --steps 200 --workers 4
//! chaos_generate --config runs/malkus.toml --seed 7
//! ```
//!
//! Flags override values from `--config`. Ctrl-C stops the batch after the
//! trajectories already running; the completed ones are still exported and
//! the id to pass to `--first-id` is printed.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use chaos_synth::batch::{assemble_dataset, run_system};
use chaos_synth::dataset::export_dataset;
use chaos_synth::telemetry::init_tracing;
use chaos_synth::{GenerationConfig, IntegratorKind, OutputMode, SystemKind};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate labeled training data from a chaotic dynamical system"
)]
struct Args {
    /// TOML run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// lorenz | rossler | double-pendulum | malkus | double-gyre
    #[arg(short, long)]
    system: Option<SystemKind>,

    /// Number of trajectories
    #[arg(short = 'n', long)]
    trajectories: Option<usize>,

    /// Integration steps per trajectory
    #[arg(long)]
    steps: Option<usize>,

    /// Fixed time step
    #[arg(long)]
    dt: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// rk4 | euler | legacy-rk4
    #[arg(long)]
    integrator: Option<IntegratorKind>,

    /// Worker threads (0 or 1 runs sequentially)
    #[arg(short, long)]
    workers: Option<usize>,

    /// next-step | classification | windows
    #[arg(short, long)]
    mode: Option<OutputMode>,

    #[arg(long)]
    sequence_length: Option<usize>,

    #[arg(long)]
    prediction_horizon: Option<usize>,

    /// First trajectory id, to resume an interrupted run
    #[arg(long, default_value_t = 0)]
    first_id: usize,

    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn into_config(self) -> Result<(GenerationConfig, usize)> {
        let mut config = match &self.config {
            Some(path) => GenerationConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GenerationConfig::default(),
        };

        if let Some(system) = self.system {
            config.system = system;
        }
        if let Some(trajectories) = self.trajectories {
            config.trajectories = trajectories;
        }
        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if self.dt.is_some() {
            config.dt = self.dt;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.integrator.is_some() {
            config.integrator = self.integrator;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(length) = self.sequence_length {
            config.window.sequence_length = length;
        }
        if let Some(horizon) = self.prediction_horizon {
            config.window.prediction_horizon = horizon;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        config.pretty |= self.pretty;

        config.validate().context("invalid configuration")?;
        Ok((config, self.first_id))
    }
}

fn rule() {
    println!("═══════════════════════════════════════════════════════════════");
}

fn main() -> Result<()> {
    init_tracing()?;
    let (config, first_id) = Args::parse().into_config()?;

    rule();
    println!("  {} Training Data Collection", config.system);
    rule();
    println!("  Trajectories:  {} × {} steps", config.trajectories, config.steps);
    println!("  Time step:     {}", config.timestep());
    println!("  Integrator:    {}", config.integrator_kind());
    println!("  Mode:          {}", config.mode);
    println!("  Seed:          {}", config.seed);
    println!("  Output:        {}\n", config.output_dir.display());

    let mut batch = config.batch();
    batch.first_id = first_id;
    batch.validate().context("invalid trajectory id range")?;

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            cancel.store(true, Ordering::Relaxed);
        })
        .context("installing Ctrl-C handler")?;
    }

    let report = run_system(
        config.system,
        config.integrator_kind(),
        &batch,
        &config.bounds,
        &cancel,
    )?;
    let summary = report.summary();

    let now = Utc::now();
    let dataset = assemble_dataset(&config, &report, now)?;
    let (path, size) = export_dataset(&dataset, &config.output_dir, config.pretty, now)
        .with_context(|| format!("writing dataset to {}", config.output_dir.display()))?;

    println!();
    rule();
    println!("  Collection Complete");
    rule();
    println!("  Completed trajectories: {}", summary.completed);
    println!("  Aborted trajectories:   {}", summary.aborted);
    if summary.cancelled {
        println!("  Batch cancelled before all trajectories ran");
        if let Some(next) = summary.resume_from {
            println!(
                "  Resume with:            --first-id {} -n {}",
                next,
                batch.end_id() - next
            );
        }
    }
    println!("  Total records:          {}", dataset.metadata.total_samples);

    if !summary.labels.is_empty() {
        println!("\n  Label distribution:");
        for (label, count) in &summary.labels {
            let percent = if summary.completed > 0 {
                100.0 * *count as f64 / summary.completed as f64
            } else {
                0.0
            };
            println!("    {:<10} {:>6} ({:.1}%)", label, count, percent);
        }
    }

    for record in &report.aborted {
        println!(
            "  ⚠ trajectory {} aborted: {}",
            record.trajectory_id, record.error
        );
    }

    println!("\n  Dataset:   {}", path.display());
    println!("  File size: {:.2} MB", size as f64 / 1024.0 / 1024.0);
    rule();

    Ok(())
}
