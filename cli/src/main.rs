//! `vtrack` CLI: scenario runs, replay evaluation, seed sweeps.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use sim::evaluate::{evaluate_tracker, RunReport};
use sim::replay::{load_replay, save_replay, ReplayLog};
use sim::scenarios::{Scenario, ScenarioKind};
use std::path::{Path, PathBuf};
use tracing::info;
use vtrack_core::{IdMode, VectorTracker, VectorTrackerConfig};

#[derive(Parser)]
#[command(name = "vtrack", about = "Feature-vector identity tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// ID allocation policy flag.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum IdModeArg {
    FirstFree,
    BrandNew,
}

impl From<IdModeArg> for IdMode {
    fn from(arg: IdModeArg) -> Self {
        match arg {
            IdModeArg::FirstFree => IdMode::FirstFree,
            IdModeArg::BrandNew => IdMode::BrandNew,
        }
    }
}

/// Tracker options shared by every subcommand.
#[derive(clap::Args, Clone, Debug)]
struct TrackerArgs {
    /// ID allocation policy
    #[arg(long, value_enum, default_value_t = IdModeArg::FirstFree)]
    id_mode: IdModeArg,
    /// Disable the trivial-assignment fast path
    #[arg(long)]
    no_opt: bool,
    /// Disable linear extrapolation on every dimension
    #[arg(long)]
    no_extrapolation: bool,
}

impl TrackerArgs {
    fn apply(&self, config: VectorTrackerConfig) -> VectorTrackerConfig {
        VectorTrackerConfig {
            id_mode: self.id_mode.into(),
            try_opt: !self.no_opt,
            ..config
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a named scenario in batch mode and output metrics.
    RunScenario {
        #[arg(value_enum)]
        scenario: ScenarioKind,
        /// Random seed for reproducibility
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[command(flatten)]
        tracker: TrackerArgs,
        /// Output metrics to a JSON file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also save the full replay log
        #[arg(long)]
        save_replay: Option<PathBuf>,
    },
    /// Load and evaluate a previously recorded frame log.
    Replay {
        /// Path to replay JSON file
        input: PathBuf,
        #[command(flatten)]
        tracker: TrackerArgs,
        /// Output metrics to a JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run a scenario over many seeds in parallel and aggregate metrics.
    Sweep {
        #[arg(value_enum)]
        scenario: ScenarioKind,
        /// Number of seeds (0..N)
        #[arg(long, default_value_t = 16)]
        seeds: u64,
        #[command(flatten)]
        tracker: TrackerArgs,
        /// Output aggregated metrics to a JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::RunScenario {
            scenario,
            seed,
            tracker,
            output,
            save_replay: save_path,
        } => {
            run_scenario(scenario, seed, &tracker, output.as_deref(), save_path.as_deref())?;
        }
        Commands::Replay {
            input,
            tracker,
            output,
        } => {
            run_replay(&input, &tracker, output.as_deref())?;
        }
        Commands::Sweep {
            scenario,
            seeds,
            tracker,
            output,
        } => {
            run_sweep(scenario, seeds, &tracker, output.as_deref())?;
        }
    }

    Ok(())
}

/// Evaluate `frames` on a fresh tracker configured from `args`.
fn evaluate_with(
    frames: &[sim::Frame],
    config: VectorTrackerConfig,
    args: &TrackerArgs,
) -> Result<RunReport> {
    let config = args.apply(config);
    let dim = config.dim;
    let mut tracker = VectorTracker::new(config)?;
    if args.no_extrapolation {
        tracker.set_extrapolation_mask(&vec![false; dim])?;
    }
    evaluate_tracker(frames, tracker)
}

fn print_report(name: &str, report: &RunReport) {
    println!(
        "Done: {} frames, {} births, {} retirements, {} targets alive, elapsed={:.3}s",
        report.frames, report.births, report.retirements, report.final_targets, report.elapsed_s,
    );
    println!(
        "'{}': {} id switches, {} fragmentations, switch rate {:.4}, fast path {}/{}",
        name,
        report.metrics.id_switches,
        report.metrics.fragmentations,
        report.id_switch_rate(),
        report.fast_path_frames,
        report.frames,
    );
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    println!("Metrics saved to {}", path.display());
    Ok(())
}

fn run_scenario(
    kind: ScenarioKind,
    seed: u64,
    args: &TrackerArgs,
    output_path: Option<&Path>,
    replay_path: Option<&Path>,
) -> Result<()> {
    let scenario = Scenario::build(kind, seed);
    println!(
        "Running scenario '{}' (seed={}, dim={}, frames={})...",
        scenario.name, seed, scenario.dim, scenario.frames
    );

    let frames = scenario.generate();
    let report = evaluate_with(&frames, scenario.tracker_config(), args)?;
    print_report(&scenario.name, &report);

    // Save replay if requested
    if let Some(rpath) = replay_path {
        let log = ReplayLog::from_frames(&scenario, frames);
        save_replay(&log, rpath)?;
        println!("Replay saved to {}", rpath.display());
    }

    if let Some(opath) = output_path {
        let json = serde_json::json!({
            "scenario": scenario.name,
            "seed": seed,
            "report": report,
            "id_switch_rate": report.id_switch_rate(),
        });
        write_json(opath, &json)?;
    }

    Ok(())
}

fn run_replay(input: &Path, args: &TrackerArgs, output_path: Option<&Path>) -> Result<()> {
    let log = load_replay(input)?;
    println!(
        "Replaying '{}' ({} frames)...",
        log.scenario_name,
        log.frames.len()
    );

    let report = evaluate_with(&log.frames, log.tracker_config(), args)?;
    print_report(&log.scenario_name, &report);

    if let Some(opath) = output_path {
        let json = serde_json::json!({
            "scenario": log.scenario_name,
            "seed": log.seed,
            "report": report,
            "id_switch_rate": report.id_switch_rate(),
        });
        write_json(opath, &json)?;
    }

    Ok(())
}

/// Aggregate of a seed sweep.
#[derive(Debug, Default, Serialize)]
struct SweepSummary {
    scenario: String,
    seeds: u64,
    frames: u64,
    id_switches: u64,
    fragmentations: u64,
    births: u64,
    mean_id_switch_rate: f64,
    worst_seed: Option<u64>,
    elapsed_s: f64,
}

fn run_sweep(
    kind: ScenarioKind,
    seeds: u64,
    args: &TrackerArgs,
    output_path: Option<&Path>,
) -> Result<()> {
    let start = std::time::Instant::now();
    info!(?kind, seeds, "starting sweep");

    // One independent tracker per seed
    let reports: Vec<(u64, RunReport)> = (0..seeds)
        .into_par_iter()
        .map(|seed| -> Result<(u64, RunReport)> {
            let scenario = Scenario::build(kind, seed);
            let report = evaluate_with(&scenario.generate(), scenario.tracker_config(), args)?;
            Ok((seed, report))
        })
        .collect::<Result<_>>()?;

    let mut summary = SweepSummary {
        scenario: Scenario::build(kind, 0).name,
        seeds,
        ..Default::default()
    };
    let mut worst = (0u64, -1.0f64);
    for (seed, report) in &reports {
        summary.frames += report.frames;
        summary.id_switches += report.metrics.id_switches;
        summary.fragmentations += report.metrics.fragmentations;
        summary.births += report.births;
        summary.mean_id_switch_rate += report.id_switch_rate();
        if report.id_switch_rate() > worst.1 {
            worst = (*seed, report.id_switch_rate());
        }
    }
    if !reports.is_empty() {
        summary.mean_id_switch_rate /= reports.len() as f64;
        summary.worst_seed = Some(worst.0);
    }
    summary.elapsed_s = start.elapsed().as_secs_f64();

    println!(
        "Sweep '{}': {} seeds, {} frames, {} id switches, mean switch rate {:.4}, elapsed={:.2}s",
        summary.scenario,
        summary.seeds,
        summary.frames,
        summary.id_switches,
        summary.mean_id_switch_rate,
        summary.elapsed_s,
    );

    if let Some(opath) = output_path {
        write_json(opath, &summary)?;
    }

    Ok(())
}
