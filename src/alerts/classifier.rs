// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/dustgrid-rs

//! Severity classification of readings

use uuid::Uuid;

use super::{Alert, Metric, Severity};
use crate::config::ThresholdConfig;
use crate::motes::Reading;

/// Severity band lower bounds for one metric (µg/m³)
struct Bands {
    moderate: f64,
    high: f64,
    critical: f64,
}

const PM25_BANDS: Bands = Bands {
    moderate: 28.0,
    high: 35.0,
    critical: 50.0,
};

const PM10_BANDS: Bands = Bands {
    moderate: 56.0,
    high: 70.0,
    critical: 100.0,
};

/// Maps readings to threshold-crossing alerts.
///
/// Classification is a pure function of the reading's particulate values
/// and the configured thresholds; the same inputs always produce the same
/// tier.
#[derive(Debug, Clone)]
pub struct AlertClassifier {
    thresholds: ThresholdConfig,
}

impl AlertClassifier {
    /// Create a classifier for the given safe thresholds.
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    /// Classify a reading, returning an alert if either metric breaches.
    ///
    /// Both metrics are evaluated independently; when both breach, the
    /// higher tier wins and ties go to PM2.5.
    pub fn classify(&self, reading: &Reading) -> Option<Alert> {
        let pm25 = severity_for(reading.pm25, self.thresholds.pm25_safe, &PM25_BANDS);
        let pm10 = severity_for(reading.pm10, self.thresholds.pm10_safe, &PM10_BANDS);

        let (metric, value, threshold, severity) = match (pm25, pm10) {
            (None, None) => return None,
            (Some(s), None) => (Metric::Pm25, reading.pm25, self.thresholds.pm25_safe, s),
            (None, Some(s)) => (Metric::Pm10, reading.pm10, self.thresholds.pm10_safe, s),
            (Some(s25), Some(s10)) => {
                if s10 > s25 {
                    (Metric::Pm10, reading.pm10, self.thresholds.pm10_safe, s10)
                } else {
                    (Metric::Pm25, reading.pm25, self.thresholds.pm25_safe, s25)
                }
            }
        };

        let message = format!(
            "{} alert at mote {}: {} {:.2} ug/m3 (threshold {:.1})",
            severity,
            reading.mote_id,
            metric.label(),
            value,
            threshold
        );

        Some(Alert {
            id: Uuid::new_v4().to_string(),
            mote_id: reading.mote_id.clone(),
            timestamp: reading.timestamp,
            metric,
            value,
            threshold,
            severity,
            location: reading.location,
            message,
        })
    }
}

fn severity_for(value: f64, safe: f64, bands: &Bands) -> Option<Severity> {
    match value {
        v if v > bands.critical => Some(Severity::Critical),
        v if v > bands.high => Some(Severity::High),
        v if v > bands.moderate => Some(Severity::Moderate),
        v if v > safe => Some(Severity::Low),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motes::Location;
    use chrono::Utc;

    fn reading(pm25: f64, pm10: f64) -> Reading {
        Reading {
            mote_id: "MOTE-001".to_string(),
            timestamp: Utc::now(),
            pm25,
            pm10,
            temperature: 20.0,
            humidity: 40.0,
            location: Location { x: 1.0, y: 2.0 },
        }
    }

    fn classifier() -> AlertClassifier {
        AlertClassifier::new(ThresholdConfig::default())
    }

    #[test]
    fn test_within_thresholds_is_no_alert() {
        let c = classifier();
        assert!(c.classify(&reading(25.0, 50.0)).is_none());
        assert!(c.classify(&reading(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_moderate_pm25_breach() {
        let alert = classifier().classify(&reading(28.5, 30.0)).unwrap();
        assert_eq!(alert.metric, Metric::Pm25);
        assert_eq!(alert.severity, Severity::Moderate);
        assert_eq!(alert.threshold, 25.0);
        assert!(alert.message.contains("MODERATE"));
        assert!(alert.message.contains("PM2.5"));
    }

    #[test]
    fn test_critical_pm25_with_safe_pm10() {
        let alert = classifier().classify(&reading(60.0, 30.0)).unwrap();
        assert_eq!(alert.metric, Metric::Pm25);
        assert_eq!(alert.severity, Severity::Critical);
    }

    #[test]
    fn test_all_pm25_tiers() {
        let c = classifier();
        assert_eq!(c.classify(&reading(26.0, 0.0)).unwrap().severity, Severity::Low);
        assert_eq!(c.classify(&reading(30.0, 0.0)).unwrap().severity, Severity::Moderate);
        assert_eq!(c.classify(&reading(40.0, 0.0)).unwrap().severity, Severity::High);
        assert_eq!(c.classify(&reading(51.0, 0.0)).unwrap().severity, Severity::Critical);
    }

    #[test]
    fn test_all_pm10_tiers() {
        let c = classifier();
        assert_eq!(c.classify(&reading(0.0, 52.0)).unwrap().severity, Severity::Low);
        assert_eq!(c.classify(&reading(0.0, 60.0)).unwrap().severity, Severity::Moderate);
        assert_eq!(c.classify(&reading(0.0, 80.0)).unwrap().severity, Severity::High);
        assert_eq!(c.classify(&reading(0.0, 120.0)).unwrap().severity, Severity::Critical);
    }

    #[test]
    fn test_higher_tier_wins_when_both_breach() {
        let alert = classifier().classify(&reading(30.0, 120.0)).unwrap();
        assert_eq!(alert.metric, Metric::Pm10);
        assert_eq!(alert.severity, Severity::Critical);
    }

    #[test]
    fn test_tie_goes_to_pm25() {
        // Both in the HIGH band
        let alert = classifier().classify(&reading(40.0, 80.0)).unwrap();
        assert_eq!(alert.metric, Metric::Pm25);
        assert_eq!(alert.severity, Severity::High);
    }

    #[test]
    fn test_severity_is_monotonic_in_pm25() {
        let c = classifier();
        let mut last = None;
        for step in 0..300 {
            let pm25 = step as f64 * 0.25;
            let severity = c.classify(&reading(pm25, 0.0)).map(|a| a.severity);
            assert!(severity >= last, "severity decreased at pm25={}", pm25);
            last = severity;
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let c = classifier();
        let r = reading(33.0, 65.0);
        let a = c.classify(&r).unwrap();
        let b = c.classify(&r).unwrap();
        assert_eq!(a.severity, b.severity);
        assert_eq!(a.metric, b.metric);
        assert_eq!(a.value, b.value);
    }
}
