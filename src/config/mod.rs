// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/dustgrid-rs

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Configuration problems, raised only at startup — never mid-run
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The simulation needs at least one mote
    #[error("number of motes must be at least 1")]
    NoMotes,

    /// Non-positive sampling interval
    #[error("sampling interval must be positive, got {0}")]
    InvalidInterval(f64),

    /// Non-positive finite duration
    #[error("duration must be positive, got {0}")]
    InvalidDuration(f64),

    /// Non-positive safety threshold
    #[error("{metric} safe threshold must be positive, got {value}")]
    InvalidThreshold {
        /// Which metric the threshold belongs to
        metric: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Spike probability outside `0.0..=1.0`
    #[error("spike probability must be within 0.0..=1.0, got {0}")]
    InvalidSpikeProbability(f64),

    /// Zero retention or statistics window capacity
    #[error("retention and window capacities must be at least 1")]
    InvalidCapacity,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level
    pub log_level: String,

    /// Simulation run parameters
    pub simulation: SimulationConfig,

    /// Safety thresholds
    pub thresholds: ThresholdConfig,

    /// Retention and windowing
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            simulation: SimulationConfig::default(),
            thresholds: ThresholdConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("dustgrid"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Check every run parameter; the orchestrator refuses to start on the
    /// first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.num_motes < 1 {
            return Err(ConfigError::NoMotes);
        }
        if self.simulation.sampling_interval_secs <= 0.0 {
            return Err(ConfigError::InvalidInterval(
                self.simulation.sampling_interval_secs,
            ));
        }
        if let Some(duration) = self.simulation.duration_secs {
            if duration <= 0.0 {
                return Err(ConfigError::InvalidDuration(duration));
            }
        }
        if self.thresholds.pm25_safe <= 0.0 {
            return Err(ConfigError::InvalidThreshold {
                metric: "pm25",
                value: self.thresholds.pm25_safe,
            });
        }
        if self.thresholds.pm10_safe <= 0.0 {
            return Err(ConfigError::InvalidThreshold {
                metric: "pm10",
                value: self.thresholds.pm10_safe,
            });
        }
        if !(0.0..=1.0).contains(&self.simulation.spike_probability) {
            return Err(ConfigError::InvalidSpikeProbability(
                self.simulation.spike_probability,
            ));
        }
        if self.store.per_mote_retention < 1
            || self.store.global_retention < 1
            || self.store.stats_window < 1
        {
            return Err(ConfigError::InvalidCapacity);
        }
        Ok(())
    }
}

/// Simulation run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of motes to spawn
    pub num_motes: usize,

    /// Seconds between tick waves
    pub sampling_interval_secs: f64,

    /// Run length in seconds; `None` runs until stopped
    pub duration_secs: Option<f64>,

    /// Side length of the square deployment area in meters
    pub area_size: f64,

    /// Per-tick chance a mote starts a pollution spike episode
    pub spike_probability: f64,

    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_motes: 5,
            sampling_interval_secs: 2.0,
            duration_secs: Some(60.0),
            area_size: 100.0,
            spike_probability: 0.02,
            seed: None,
        }
    }
}

/// Safe pollution thresholds (WHO guideline values), µg/m³
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// PM2.5 safe threshold
    pub pm25_safe: f64,

    /// PM10 safe threshold
    pub pm10_safe: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            pm25_safe: 25.0,
            pm10_safe: 50.0,
        }
    }
}

/// Retention caps and statistics windowing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Readings kept per mote
    pub per_mote_retention: usize,

    /// Readings kept across all motes
    pub global_retention: usize,

    /// Readings the rolling statistics reduce over
    pub stats_window: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            per_mote_retention: 100,
            global_retention: 1000,
            stats_window: 100,
        }
    }
}
