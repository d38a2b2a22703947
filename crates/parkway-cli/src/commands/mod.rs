//! CLI command modules

pub mod config;
pub mod park;
pub mod simulate;
pub mod train;
pub mod view;

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use parkway_rl::{
    AllocatorEngine, LotGeometry, RandomSnapshotSource, Recommendation, SnapshotSource,
    TrainingReport,
};

use crate::config::Config;

/// Allocator options shared by `train` and `simulate`; unset flags fall back
/// to the loaded configuration
#[derive(Args, Debug, Clone, Default)]
pub struct AllocatorArgs {
    /// Number of training episodes
    #[arg(short, long)]
    pub episodes: Option<usize>,

    /// Floors in the simulated lot
    #[arg(long)]
    pub floors: Option<usize>,

    /// Slots on each floor
    #[arg(long)]
    pub slots_per_floor: Option<usize>,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Resolved settings for one allocator session
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub geometry: LotGeometry,
    pub episodes: usize,
    pub seed: Option<u64>,
    pub json: bool,
    pub training_delay: Duration,
    pub refresh_delay: Duration,
}

impl RunPlan {
    pub fn resolve(args: &AllocatorArgs, config: &Config) -> Result<Self> {
        let a = &config.allocator;
        let geometry = LotGeometry::new(
            args.floors.unwrap_or(a.floors),
            args.slots_per_floor.unwrap_or(a.slots_per_floor),
        )?;
        Ok(Self {
            geometry,
            episodes: args.episodes.unwrap_or(a.episodes),
            seed: args.seed,
            json: args.json,
            training_delay: Duration::from_millis(a.training_delay_ms),
            refresh_delay: Duration::from_millis(a.refresh_delay_ms),
        })
    }

    pub fn engine(&self) -> AllocatorEngine {
        AllocatorEngine::new(self.geometry, self.seed)
    }

    /// Snapshot source seeded apart from the engine so the two streams differ
    pub fn source(&self) -> RandomSnapshotSource {
        match self.seed {
            Some(seed) => RandomSnapshotSource::seeded(seed.wrapping_add(1)),
            None => RandomSnapshotSource::from_entropy(),
        }
    }
}

/// Train with a progress line on stderr, pausing between episodes when a
/// training delay is configured
pub async fn run_training(
    engine: &mut AllocatorEngine,
    source: &mut dyn SnapshotSource,
    plan: &RunPlan,
) -> TrainingReport {
    let show_progress = |done: usize, total: usize| {
        if !plan.json {
            eprint!("\rTraining {done}/{total}");
        }
    };

    let report = if plan.training_delay.is_zero() {
        engine.train_with_progress(plan.episodes, source, show_progress)
    } else {
        engine.begin_run();
        for done in 1..=plan.episodes {
            engine.train_step(source);
            show_progress(done, plan.episodes);
            tokio::time::sleep(plan.training_delay).await;
        }
        engine.finish_run()
    };

    if !plan.json && plan.episodes > 0 {
        eprintln!();
    }
    report
}

pub fn print_report(report: &TrainingReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!("Training complete ({} episodes)", report.episodes);
    println!("{:<28} {:>8.2}", "Average reward (allocator)", report.average_allocator_reward);
    println!("{:<28} {:>8.2}", "Average reward (random)", report.average_random_reward);
    println!("{:<28} {:>+8.2}", "Improvement", report.improvement);
    Ok(())
}

pub fn print_recommendation(tick: usize, rec: &Recommendation, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(rec)?);
        return Ok(());
    }
    println!(
        "[{tick:>3}] Suggested: floor {} slot {} | efficiency {:>5.1}% | {}",
        rec.floor + 1,
        rec.slot + 1,
        rec.efficiency,
        rec.congestion
    );
    Ok(())
}
