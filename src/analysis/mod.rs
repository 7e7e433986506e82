//! Rolling pollution statistics

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::ThresholdConfig;
use crate::motes::Reading;
use crate::store::ReadingStore;

/// Scope id of the cross-mote aggregate snapshot
pub const GLOBAL_SCOPE: &str = "global";

/// Whether average pollution sits within the safe thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyStatus {
    /// Both averages at or below their safe thresholds
    Safe,
    /// At least one average above its safe threshold
    Unsafe,
}

/// Rolling aggregate over one mote's recent readings, or the global scope.
///
/// Snapshots are recomputed and replaced wholesale; they are never mutated
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    /// Mote id, or [`GLOBAL_SCOPE`] for the aggregate
    pub mote_id: String,
    /// Readings covered by this snapshot
    pub count: usize,
    /// Mean PM2.5 over the window
    pub avg_pm25: f64,
    /// Mean PM10 over the window
    pub avg_pm10: f64,
    /// Window maximum PM2.5
    pub max_pm25: f64,
    /// Window maximum PM10
    pub max_pm10: f64,
    /// Window minimum PM2.5
    pub min_pm25: f64,
    /// Window minimum PM10
    pub min_pm10: f64,
    /// Classification of the averages against the safe thresholds
    pub status: SafetyStatus,
}

impl StatSnapshot {
    /// Defined zero snapshot for a scope with no readings yet
    pub fn empty(scope: &str) -> Self {
        Self {
            mote_id: scope.to_string(),
            count: 0,
            avg_pm25: 0.0,
            avg_pm10: 0.0,
            max_pm25: 0.0,
            max_pm10: 0.0,
            min_pm25: 0.0,
            min_pm10: 0.0,
            status: SafetyStatus::Safe,
        }
    }
}

/// Computes and caches rolling statistics over the reading store
pub struct StatisticsEngine {
    store: Arc<ReadingStore>,
    thresholds: ThresholdConfig,
    window: usize,
    snapshots: RwLock<HashMap<String, StatSnapshot>>,
}

impl StatisticsEngine {
    /// Create an engine reducing over the last `window` readings per mote.
    pub fn new(store: Arc<ReadingStore>, thresholds: ThresholdConfig, window: usize) -> Self {
        Self {
            store,
            thresholds,
            window,
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    /// Recompute one mote's snapshot from the store and cache it.
    ///
    /// Recomputing with no new readings in between yields an identical
    /// snapshot.
    pub fn update(&self, mote_id: &str) -> StatSnapshot {
        let readings = self.store.recent(mote_id, self.window);
        let snapshot = self.reduce(mote_id, &readings);
        self.snapshots
            .write()
            .insert(mote_id.to_string(), snapshot.clone());
        snapshot
    }

    /// Latest cached snapshot for one mote, if it has ever been updated
    pub fn snapshot(&self, mote_id: &str) -> Option<StatSnapshot> {
        self.snapshots.read().get(mote_id).cloned()
    }

    /// Aggregate across all motes' latest snapshots.
    ///
    /// Per-mote averages are combined unweighted; extremes take the max of
    /// maxes and min of mins. Empty input yields the zero snapshot.
    pub fn global_snapshot(&self) -> StatSnapshot {
        let snapshots = self.snapshots.read();
        let populated: Vec<&StatSnapshot> = snapshots.values().filter(|s| s.count > 0).collect();
        if populated.is_empty() {
            return StatSnapshot::empty(GLOBAL_SCOPE);
        }

        let n = populated.len() as f64;
        let mut count = 0;
        let mut avg_pm25 = 0.0;
        let mut avg_pm10 = 0.0;
        let mut max_pm25 = f64::MIN;
        let mut max_pm10 = f64::MIN;
        let mut min_pm25 = f64::MAX;
        let mut min_pm10 = f64::MAX;

        for s in &populated {
            count += s.count;
            avg_pm25 += s.avg_pm25;
            avg_pm10 += s.avg_pm10;
            max_pm25 = max_pm25.max(s.max_pm25);
            max_pm10 = max_pm10.max(s.max_pm10);
            min_pm25 = min_pm25.min(s.min_pm25);
            min_pm10 = min_pm10.min(s.min_pm10);
        }
        avg_pm25 /= n;
        avg_pm10 /= n;

        StatSnapshot {
            mote_id: GLOBAL_SCOPE.to_string(),
            count,
            avg_pm25,
            avg_pm10,
            max_pm25,
            max_pm10,
            min_pm25,
            min_pm10,
            status: self.status_for(avg_pm25, avg_pm10),
        }
    }

    fn reduce(&self, scope: &str, readings: &[Reading]) -> StatSnapshot {
        if readings.is_empty() {
            return StatSnapshot::empty(scope);
        }

        let count = readings.len();
        let mut sum_pm25 = 0.0;
        let mut sum_pm10 = 0.0;
        let mut max_pm25 = f64::MIN;
        let mut max_pm10 = f64::MIN;
        let mut min_pm25 = f64::MAX;
        let mut min_pm10 = f64::MAX;

        for r in readings {
            sum_pm25 += r.pm25;
            sum_pm10 += r.pm10;
            max_pm25 = max_pm25.max(r.pm25);
            max_pm10 = max_pm10.max(r.pm10);
            min_pm25 = min_pm25.min(r.pm25);
            min_pm10 = min_pm10.min(r.pm10);
        }

        let avg_pm25 = sum_pm25 / count as f64;
        let avg_pm10 = sum_pm10 / count as f64;

        StatSnapshot {
            mote_id: scope.to_string(),
            count,
            avg_pm25,
            avg_pm10,
            max_pm25,
            max_pm10,
            min_pm25,
            min_pm10,
            status: self.status_for(avg_pm25, avg_pm10),
        }
    }

    fn status_for(&self, avg_pm25: f64, avg_pm10: f64) -> SafetyStatus {
        if avg_pm25 <= self.thresholds.pm25_safe && avg_pm10 <= self.thresholds.pm10_safe {
            SafetyStatus::Safe
        } else {
            SafetyStatus::Unsafe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motes::Location;
    use chrono::Utc;

    fn reading(mote_id: &str, pm25: f64, pm10: f64) -> Reading {
        Reading {
            mote_id: mote_id.to_string(),
            timestamp: Utc::now(),
            pm25,
            pm10,
            temperature: 20.0,
            humidity: 40.0,
            location: Location { x: 0.0, y: 0.0 },
        }
    }

    fn engine(store: Arc<ReadingStore>) -> StatisticsEngine {
        StatisticsEngine::new(store, ThresholdConfig::default(), 100)
    }

    #[test]
    fn test_update_reduces_window() {
        let store = Arc::new(ReadingStore::new(100, 1000));
        let stats = engine(Arc::clone(&store));

        store.append(reading("MOTE-001", 10.0, 30.0));
        store.append(reading("MOTE-001", 20.0, 40.0));
        store.append(reading("MOTE-001", 30.0, 50.0));

        let snap = stats.update("MOTE-001");
        assert_eq!(snap.count, 3);
        assert!((snap.avg_pm25 - 20.0).abs() < 1e-9);
        assert!((snap.avg_pm10 - 40.0).abs() < 1e-9);
        assert_eq!(snap.max_pm25, 30.0);
        assert_eq!(snap.min_pm25, 10.0);
        assert_eq!(snap.status, SafetyStatus::Safe);
    }

    #[test]
    fn test_update_is_idempotent_without_new_readings() {
        let store = Arc::new(ReadingStore::new(100, 1000));
        let stats = engine(Arc::clone(&store));

        store.append(reading("MOTE-001", 12.5, 33.0));
        store.append(reading("MOTE-001", 17.5, 45.0));

        let first = stats.update("MOTE-001");
        let second = stats.update("MOTE-001");
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_scope_yields_zero_snapshot() {
        let store = Arc::new(ReadingStore::new(100, 1000));
        let stats = engine(store);

        let snap = stats.update("MOTE-404");
        assert_eq!(snap.count, 0);
        assert_eq!(snap.avg_pm25, 0.0);
        assert_eq!(snap.status, SafetyStatus::Safe);
        assert_eq!(stats.global_snapshot(), StatSnapshot::empty(GLOBAL_SCOPE));
    }

    #[test]
    fn test_unsafe_when_average_breaches_either_threshold() {
        let store = Arc::new(ReadingStore::new(100, 1000));
        let stats = engine(Arc::clone(&store));

        store.append(reading("MOTE-001", 10.0, 80.0));
        let snap = stats.update("MOTE-001");
        assert_eq!(snap.status, SafetyStatus::Unsafe);
    }

    #[test]
    fn test_global_snapshot_aggregates_motes() {
        let store = Arc::new(ReadingStore::new(100, 1000));
        let stats = engine(Arc::clone(&store));

        store.append(reading("MOTE-001", 10.0, 20.0));
        store.append(reading("MOTE-002", 30.0, 60.0));
        stats.update("MOTE-001");
        stats.update("MOTE-002");

        let global = stats.global_snapshot();
        assert_eq!(global.mote_id, GLOBAL_SCOPE);
        assert_eq!(global.count, 2);
        assert!((global.avg_pm25 - 20.0).abs() < 1e-9);
        assert!((global.avg_pm10 - 40.0).abs() < 1e-9);
        assert_eq!(global.max_pm10, 60.0);
        assert_eq!(global.min_pm25, 10.0);
        assert_eq!(global.status, SafetyStatus::Safe);
    }
}
