// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/dustgrid-rs

//! DustGrid - Smart Dust Environmental Monitoring Simulation
//!
//! A Rust pipeline that simulates a network of Smart Dust motes emitting
//! pollution readings, with:
//! - Per-mote synthetic generation (baseline profiles, spike episodes)
//! - Bounded per-mote and global reading retention
//! - Rolling aggregate statistics with SAFE/UNSAFE classification
//! - Threshold-based severity alerting (LOW → CRITICAL)
//! - Concurrent tick waves driven by a single orchestrator
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Orchestrator                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────┐   ┌─────────┐   ┌────────────┐   ┌─────────┐  │
//! │  │ Motes │ → │ Reading │ → │ Statistics │ → │  Alert  │  │
//! │  │ (N×)  │   │  Store  │   │   Engine   │   │ Classif.│  │
//! │  └───────┘   └─────────┘   └────────────┘   └────┬────┘  │
//! │                                                  ↓       │
//! │  ┌─────────────────────────────────┐        ┌─────────┐  │
//! │  │            Event Bus            │ ←───── │AlertLog │  │
//! │  └─────────────────────────────────┘        └─────────┘  │
//! └──────────────────────────────────────────────────────────┘
//!           ↓ snapshot()
//!   external persistence / visualization consumers
//! ```

#![warn(missing_docs)]
#![allow(dead_code)]

pub mod alerts;
pub mod analysis;
pub mod config;
pub mod core;
pub mod export;
pub mod motes;
pub mod store;

// Re-exports for convenience
pub use alerts::{Alert, AlertClassifier, AlertLog, Metric, Severity};
pub use analysis::{SafetyStatus, StatSnapshot, StatisticsEngine};
pub use config::{Config, ConfigError, ThresholdConfig};
pub use crate::core::{EventBus, Orchestrator, SimulationState};
pub use export::{PollutionCell, SystemSnapshot};
pub use motes::{Location, Mote, Reading};
pub use store::ReadingStore;

/// DustGrid version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// DustGrid name
pub const NAME: &str = "DustGrid";

/// Install a global tracing subscriber, honoring `RUST_LOG` and falling
/// back to `default_filter`.
pub fn init_logging(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}
