//! Parkway CLI - park vehicles, view the lot, train and watch the allocator
//!
//! Everything lives for one invocation: the occupancy grid and the value
//! table are created when a command starts and dropped when it exits.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]
#![allow(clippy::cast_precision_loss)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parkway_core::util::load_env_file;

mod commands;
mod config;

use commands::{park, simulate, train, view};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "parkway")]
#[command(author, version, about = "Parkway - multi-floor parking allocator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find and occupy slots for arriving vehicles
    Park(park::ParkArgs),

    /// Show the occupancy grid
    View(view::ViewArgs),

    /// Train the allocator and compare it with random choice
    Train(train::TrainArgs),

    /// Train, then show live slot recommendations
    Simulate(simulate::SimulateArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(commands::config::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from parkway.env file (before parsing args)
    load_env_file();

    let cli = Cli::parse();
    let config = Config::load()?;

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("parkway={log_level},parkway_core={log_level},parkway_rl={log_level}")
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Park(args) => park::run(args).await,
        Commands::View(args) => view::run(args).await,
        Commands::Train(args) => train::run(args, &config).await,
        Commands::Simulate(args) => simulate::run(args, &config).await,
        Commands::Config(cmd) => commands::config::run(cmd, &config).await,
    }
}
