//! Lorenz Attractor: Sensitivity to Initial Conditions
//!
//! Integrates a reference trajectory and three copies whose x, y or z
//! coordinate is shifted by ε, then reports how the separation grows.
//! Also prints per-coordinate statistics, pseudo-energy and distance from
//! the origin for the reference run.

use anyhow::{bail, Result};
use clap::Parser;
use ndarray::array;

use chaos_synth::diagnostics::divergence::{divergence_curve, finite_time_growth_rate};
use chaos_synth::telemetry::init_tracing;
use chaos_synth::{Lorenz, Rk4, TrajectoryGenerator};

#[derive(Parser, Debug)]
#[command(author, version, about = "Butterfly-effect report for the Lorenz system")]
struct Args {
    #[arg(long, default_value_t = 10.0)]
    sigma: f64,

    #[arg(long, default_value_t = 28.0)]
    rho: f64,

    #[arg(long, default_value_t = 8.0 / 3.0)]
    beta: f64,

    /// Initial state x y z
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [1.0, 1.0, 1.0])]
    initial: Vec<f64>,

    /// Perturbation size
    #[arg(long, default_value_t = 0.01)]
    epsilon: f64,

    #[arg(long, default_value_t = 0.01)]
    dt: f64,

    #[arg(long, default_value_t = 5000)]
    steps: usize,

    /// Print the separation every this many steps
    #[arg(long, default_value_t = 500)]
    report_every: usize,
}

fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len().max(1) as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

fn main() -> Result<()> {
    init_tracing()?;
    let args = Args::parse();

    println!("═══════════════════════════════════════════════════════════════");
    println!("  Lorenz Attractor Sensitivity Analysis");
    println!("═══════════════════════════════════════════════════════════════\n");
    println!("Parameters: σ={}, ρ={}, β={:.4}", args.sigma, args.rho, args.beta);
    println!(
        "Time span: 0 → {:.2} ({} steps, dt = {})",
        args.steps as f64 * args.dt,
        args.steps,
        args.dt
    );
    println!("Perturbation: ε = {}\n", args.epsilon);

    let lorenz = Lorenz::new(args.sigma, args.rho, args.beta);
    let generator = TrajectoryGenerator::new(args.steps, args.dt);
    let [x0, y0, z0] = args.initial[..] else {
        bail!("--initial takes exactly three values");
    };
    let origin = array![x0, y0, z0];

    let reference = generator.generate(0, &lorenz, &Rk4, origin.clone())?;

    println!("Reference trajectory statistics:");
    println!("───────────────────────────────────────────────────────────────");
    for (index, name) in reference.coordinate_names.iter().enumerate() {
        let series = reference.coordinate_series(index);
        let (mean, std) = mean_std(&series);
        let min = series.iter().copied().fold(f64::INFINITY, f64::min);
        let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "  {}: mean={:7.3}, std={:7.3}, range=[{:7.3}, {:7.3}]",
            name.to_uppercase(),
            mean,
            std,
            min,
            max
        );
    }
    for quantity in ["energy", "distance_from_origin"] {
        if let Some(series) = reference.auxiliary_series(quantity) {
            let (mean, std) = mean_std(&series);
            println!("  {}: mean={:7.3}, std={:7.3}", quantity, mean, std);
        }
    }

    println!("\nPerturbed trajectories:");
    println!("───────────────────────────────────────────────────────────────");
    for (axis, name) in ["x", "y", "z"].iter().enumerate() {
        let mut shifted = origin.clone();
        shifted[axis] += args.epsilon;
        let perturbed = generator.generate(axis + 1, &lorenz, &Rk4, shifted)?;
        let curve = divergence_curve(&reference, &perturbed)?;

        println!("\n  {} + ε:", name.to_uppercase());
        let every = args.report_every.max(1);
        for (step, separation) in curve.iter().enumerate().filter(|(s, _)| (s + 1) % every == 0) {
            println!(
                "    t = {:7.2}  separation = {:.6e}",
                (step + 1) as f64 * args.dt,
                separation
            );
        }

        if let Some(&last) = curve.last() {
            let elapsed = args.steps as f64 * args.dt;
            match finite_time_growth_rate(args.epsilon, last, elapsed) {
                Some(rate) => println!("    growth rate ≈ {:.4} per unit time", rate),
                None => println!("    growth rate undefined"),
            }
        }
    }

    println!("\n═══════════════════════════════════════════════════════════════");
    Ok(())
}
