//! Alert types, threshold classification and history

mod classifier;
mod log;

pub use classifier::AlertClassifier;
pub use log::AlertLog;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::motes::Location;

/// Ordinal severity of a threshold breach
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    /// Just above the safe threshold
    Low,
    /// Clearly elevated
    Moderate,
    /// Well above safe levels
    High,
    /// Hazardous
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "LOW",
            Severity::Moderate => "MODERATE",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// Which particulate metric breached its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Fine particulates, ≤2.5 µm
    Pm25,
    /// Coarse particulates, ≤10 µm
    Pm10,
}

impl Metric {
    /// Human-readable metric name
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Pm25 => "PM2.5",
            Metric::Pm10 => "PM10",
        }
    }
}

/// A threshold-crossing alert derived from one stored reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Unique alert id
    pub id: String,
    /// Mote that produced the breaching reading
    pub mote_id: String,
    /// Timestamp of the breaching reading
    pub timestamp: DateTime<Utc>,
    /// The metric that triggered the alert
    pub metric: Metric,
    /// Observed value (µg/m³)
    pub value: f64,
    /// Safe threshold the value exceeded (µg/m³)
    pub threshold: f64,
    /// Assigned severity tier
    pub severity: Severity,
    /// Where the breach was observed
    pub location: Location,
    /// Human-readable alert line
    pub message: String,
}
