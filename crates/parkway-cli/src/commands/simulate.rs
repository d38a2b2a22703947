//! Live simulation: repeated recommendations against fresh snapshots

use anyhow::Result;
use clap::Args;
use tracing::debug;

use parkway_rl::{AllocatorEngine, Recommendation, SnapshotSource};

use super::{print_recommendation, print_report, run_training, AllocatorArgs, RunPlan};
use crate::config::{validate_refreshes, Config};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub allocator: AllocatorArgs,

    /// Number of live refreshes (defaults to config)
    #[arg(short, long)]
    pub refreshes: Option<usize>,
}

pub async fn run(args: SimulateArgs, config: &Config) -> Result<()> {
    let refreshes =
        validate_refreshes(args.refreshes.unwrap_or(config.allocator.live_refreshes))?;
    let plan = RunPlan::resolve(&args.allocator, config)?;
    let mut engine = plan.engine();
    let mut source = plan.source();

    let report = run_training(&mut engine, &mut source, &plan).await;
    print_report(&report, plan.json)?;

    live_loop(&engine, &mut source, &plan, refreshes).await?;
    Ok(())
}

/// Fixed number of refreshes with a pause between them; always runs to the end
pub async fn live_loop(
    engine: &AllocatorEngine,
    source: &mut dyn SnapshotSource,
    plan: &RunPlan,
    refreshes: usize,
) -> Result<Vec<Recommendation>> {
    if !plan.json {
        println!();
        println!("Live simulation ({refreshes} refreshes)");
    }

    let mut shown = Vec::with_capacity(refreshes);
    for tick in 1..=refreshes {
        let rec = engine.recommend(source);
        print_recommendation(tick, &rec, plan.json)?;
        debug!("Live refresh {} of {}", tick, refreshes);
        shown.push(rec);

        if tick < refreshes && !plan.refresh_delay.is_zero() {
            tokio::time::sleep(plan.refresh_delay).await;
        }
    }
    Ok(shown)
}
