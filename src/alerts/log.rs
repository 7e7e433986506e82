// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/dustgrid-rs

//! Append-only alert history

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{Alert, Severity};

/// Queryable history of every alert raised during a run.
///
/// Strictly append-only: entries are never deleted or reordered, so the
/// log order is detection order. Writes serialize on the lock; the
/// orchestrator's alert path is the single writer.
#[derive(Default)]
pub struct AlertLog {
    alerts: RwLock<Vec<Alert>>,
}

impl AlertLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an alert.
    pub fn record(&self, alert: Alert) {
        self.alerts.write().push(alert);
    }

    /// Total alerts recorded
    pub fn len(&self) -> usize {
        self.alerts.read().len()
    }

    /// True when nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.alerts.read().is_empty()
    }

    /// Last `n` alerts, oldest first / newest last.
    pub fn recent(&self, n: usize) -> Vec<Alert> {
        let alerts = self.alerts.read();
        alerts
            .iter()
            .skip(alerts.len().saturating_sub(n))
            .cloned()
            .collect()
    }

    /// All alerts raised by one mote, in detection order.
    pub fn by_mote(&self, mote_id: &str) -> Vec<Alert> {
        self.alerts
            .read()
            .iter()
            .filter(|a| a.mote_id == mote_id)
            .cloned()
            .collect()
    }

    /// Alert counts grouped by severity tier.
    pub fn count_by_severity(&self) -> HashMap<Severity, usize> {
        let mut counts = HashMap::new();
        for alert in self.alerts.read().iter() {
            *counts.entry(alert.severity).or_insert(0) += 1;
        }
        counts
    }
}
