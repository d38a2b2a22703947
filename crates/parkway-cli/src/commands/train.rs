//! Allocator training

use anyhow::Result;
use clap::Args;

use super::simulate::live_loop;
use super::{print_report, run_training, AllocatorArgs, RunPlan};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub allocator: AllocatorArgs,

    /// Follow training with the live simulation
    #[arg(long, conflicts_with = "no_live")]
    pub live: bool,

    /// Skip the live simulation even if enabled in config
    #[arg(long)]
    pub no_live: bool,

    /// Print per-window averages of both reward traces
    #[arg(long, value_name = "EPISODES")]
    pub windows: Option<usize>,
}

pub async fn run(args: TrainArgs, config: &Config) -> Result<()> {
    let plan = RunPlan::resolve(&args.allocator, config)?;
    let mut engine = plan.engine();
    let mut source = plan.source();

    let report = run_training(&mut engine, &mut source, &plan).await;
    print_report(&report, plan.json)?;

    if let Some(window) = args.windows.filter(|w| *w > 0) {
        if !plan.json {
            println!();
            println!("{:>10} {:>10} {:>10}", "episodes", "allocator", "random");
            let windows = engine.trace().window_averages(window);
            for (i, (allocator, random)) in windows.iter().enumerate() {
                let end = ((i + 1) * window).min(report.episodes);
                println!("{end:>10} {allocator:>10.2} {random:>10.2}");
            }
        }
    }

    let live = if args.no_live {
        false
    } else {
        args.live || config.allocator.live_simulation
    };
    if live {
        live_loop(&engine, &mut source, &plan, config.allocator.live_refreshes).await?;
    }
    Ok(())
}
