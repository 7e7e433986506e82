// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/dustgrid-rs

//! Mote types and synthetic reading generation

mod mote;

pub use mote::Mote;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Planar position of a mote within the simulated area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// East-west coordinate in meters
    pub x: f64,
    /// North-south coordinate in meters
    pub y: f64,
}

/// A single pollution reading emitted by one mote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    /// Identifier of the emitting mote
    pub mote_id: String,
    /// Sampling instant
    pub timestamp: DateTime<Utc>,
    /// PM2.5 particulate concentration (µg/m³)
    pub pm25: f64,
    /// PM10 particulate concentration (µg/m³)
    pub pm10: f64,
    /// Ambient temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Where the reading was taken
    pub location: Location,
}
