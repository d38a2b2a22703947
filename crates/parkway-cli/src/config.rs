//! Configuration loading for the Parkway CLI

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use parkway_core::util::user_config_dir;
use parkway_core::ParkwayError;
use parkway_rl::LotGeometry;

/// Configuration for the CLI
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub allocator: AllocatorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Allocator run settings; learning constants are fixed and not configurable
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AllocatorConfig {
    pub floors: usize,
    pub slots_per_floor: usize,
    pub episodes: usize,
    pub live_simulation: bool,
    pub live_refreshes: usize,
    pub refresh_delay_ms: u64,
    pub training_delay_ms: u64,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            floors: 5,
            slots_per_floor: 10,
            episodes: 300,
            live_simulation: true,
            live_refreshes: 10,
            refresh_delay_ms: 300,
            training_delay_ms: 0,
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Self::find_config_file().as_deref())
    }

    /// Load from an explicit file (if any) plus `PARKWAY__*` environment overrides
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        if let Some(path) = path {
            tracing::info!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        } else {
            tracing::info!("No config file found, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix("PARKWAY")
                .separator("__")
                .try_parsing(true),
        );

        let config: Config = builder
            .build()?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject shapes the allocator cannot run with
    pub fn validate(&self) -> std::result::Result<(), ParkwayError> {
        let a = &self.allocator;
        if a.floors == 0 {
            return Err(ParkwayError::Config("allocator.floors must be at least 1".into()));
        }
        if a.slots_per_floor == 0 {
            return Err(ParkwayError::Config(
                "allocator.slots_per_floor must be at least 1".into(),
            ));
        }
        LotGeometry::new(a.floors, a.slots_per_floor)
            .map_err(|e| ParkwayError::Config(format!("allocator lot shape: {e}")))?;
        validate_refreshes(a.live_refreshes)?;
        Ok(())
    }

    /// Render as TOML, e.g. for `config init`
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Find the configuration file
    pub fn find_config_file() -> Option<PathBuf> {
        // Check in order: PARKWAY_CONFIG env, ./parkway.toml, ~/.config/parkway/parkway.toml
        if let Ok(path) = std::env::var("PARKWAY_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local = PathBuf::from("parkway.toml");
        if local.exists() {
            return Some(local);
        }

        user_config_dir()
            .map(|dir| dir.join("parkway.toml"))
            .filter(|p| p.exists())
    }
}

/// The live loop needs at least one refresh, whether set in config or on the
/// command line
pub fn validate_refreshes(refreshes: usize) -> std::result::Result<usize, ParkwayError> {
    if refreshes == 0 {
        return Err(ParkwayError::Config(
            "allocator.live_refreshes must be at least 1".into(),
        ));
    }
    Ok(refreshes)
}
