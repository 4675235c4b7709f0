//! Configuration file support for Cyclecast.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/cyclecast/config.toml`.

use crate::{CalendarDate, CycleProfile, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub defaults: ProfileDefaults,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Values used when a cycle profile is entered without them
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileDefaults {
    #[serde(default = "default_cycle_length_days")]
    pub cycle_length_days: u32,

    #[serde(default = "default_period_duration_days")]
    pub period_duration_days: u32,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            cycle_length_days: default_cycle_length_days(),
            period_duration_days: default_period_duration_days(),
        }
    }
}

impl ProfileDefaults {
    /// Build a validated profile, filling missing values from the defaults
    pub fn profile(
        &self,
        last_period_start: CalendarDate,
        cycle_length_days: Option<u32>,
        period_duration_days: Option<u32>,
    ) -> Result<CycleProfile> {
        CycleProfile::new(
            last_period_start,
            cycle_length_days.unwrap_or(self.cycle_length_days),
            period_duration_days.unwrap_or(self.period_duration_days),
        )
    }
}

/// Output sizing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_forecast_count")]
    pub forecast_count: usize,

    #[serde(default = "default_calendar_days")]
    pub calendar_days: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            forecast_count: default_forecast_count(),
            calendar_days: default_calendar_days(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("cyclecast")
}

fn default_cycle_length_days() -> u32 {
    28
}

fn default_period_duration_days() -> u32 {
    5
}

fn default_forecast_count() -> usize {
    3
}

fn default_calendar_days() -> u32 {
    28
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("cyclecast").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
