//! Configuration management commands

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::Config;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a configuration file with default values
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,

        /// Where to write the file
        #[arg(long, default_value = "parkway.toml")]
        path: String,
    },
}

pub async fn run(cmd: ConfigCommands, config: &Config) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(config).await,
        ConfigCommands::Init { force, path } => init(Path::new(&path), force).await,
    }
}

async fn show(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    match Config::find_config_file() {
        Some(path) => println!("Config file: {}\n", path.display()),
        None => println!("No configuration file found. Using defaults.\n"),
    }
    println!("{}", config.to_toml()?);
    Ok(())
}

async fn init(path: &Path, force: bool) -> Result<()> {
    if write_default(path, force)? {
        println!("Configuration file created: {}", path.display());
    } else {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to overwrite");
    }
    Ok(())
}

/// Returns false when the file exists and `force` is not set
fn write_default(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    let text = Config::default().to_toml()?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}
