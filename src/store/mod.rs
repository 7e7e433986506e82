// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/dustgrid-rs

//! Bounded, time-ordered reading buffers

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::motes::Reading;

/// Shared store of recent readings, per mote and globally.
///
/// Both buffers are rings with a fixed retention cap, so memory stays
/// bounded over arbitrarily long runs. Appends and reads serialize on a
/// lock whose critical section is a pure copy/push; reading generation
/// never happens inside it.
pub struct ReadingStore {
    per_mote: RwLock<HashMap<String, VecDeque<Reading>>>,
    global: RwLock<VecDeque<Reading>>,
    per_mote_cap: usize,
    global_cap: usize,
    total_appended: AtomicU64,
}

impl ReadingStore {
    /// Create a store with the given per-mote and global retention caps.
    pub fn new(per_mote_cap: usize, global_cap: usize) -> Self {
        Self {
            per_mote: RwLock::new(HashMap::new()),
            global: RwLock::new(VecDeque::with_capacity(global_cap)),
            per_mote_cap,
            global_cap,
            total_appended: AtomicU64::new(0),
        }
    }

    /// Append a reading, evicting the oldest entries past the caps.
    pub fn append(&self, reading: Reading) {
        {
            let mut per_mote = self.per_mote.write();
            let buf = per_mote
                .entry(reading.mote_id.clone())
                .or_insert_with(|| VecDeque::with_capacity(self.per_mote_cap));
            if buf.len() == self.per_mote_cap {
                buf.pop_front();
            }
            buf.push_back(reading.clone());
        }

        {
            let mut global = self.global.write();
            if global.len() == self.global_cap {
                global.pop_front();
            }
            global.push_back(reading);
        }

        self.total_appended.fetch_add(1, Ordering::Relaxed);
    }

    /// Last `n` readings for one mote, oldest first / newest last.
    pub fn recent(&self, mote_id: &str, n: usize) -> Vec<Reading> {
        let per_mote = self.per_mote.read();
        match per_mote.get(mote_id) {
            Some(buf) => buf
                .iter()
                .skip(buf.len().saturating_sub(n))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Last `n` readings across all motes, oldest first / newest last.
    pub fn all_recent(&self, n: usize) -> Vec<Reading> {
        let global = self.global.read();
        global
            .iter()
            .skip(global.len().saturating_sub(n))
            .cloned()
            .collect()
    }

    /// Number of motes that have stored at least one reading
    pub fn mote_count(&self) -> usize {
        self.per_mote.read().len()
    }

    /// Lifetime count of appended readings, including evicted ones
    pub fn total_appended(&self) -> u64 {
        self.total_appended.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motes::Location;
    use chrono::{Duration, Utc};

    fn reading(mote_id: &str, seq: i64) -> Reading {
        Reading {
            mote_id: mote_id.to_string(),
            timestamp: Utc::now() + Duration::milliseconds(seq),
            pm25: seq as f64,
            pm10: seq as f64 * 2.0,
            temperature: 20.0,
            humidity: 40.0,
            location: Location { x: 0.0, y: 0.0 },
        }
    }

    #[test]
    fn test_retention_cap_keeps_newest() {
        let store = ReadingStore::new(5, 100);
        for i in 0..12 {
            store.append(reading("MOTE-001", i));
        }

        let recent = store.recent("MOTE-001", 12);
        assert_eq!(recent.len(), 5);
        // newest-last, timestamp order preserved
        let values: Vec<f64> = recent.iter().map(|r| r.pm25).collect();
        assert_eq!(values, vec![7.0, 8.0, 9.0, 10.0, 11.0]);
        assert_eq!(store.total_appended(), 12);
    }

    #[test]
    fn test_recent_returns_min_of_n_and_cap() {
        let store = ReadingStore::new(10, 100);
        for i in 0..3 {
            store.append(reading("MOTE-001", i));
        }

        assert_eq!(store.recent("MOTE-001", 8).len(), 3);
        assert_eq!(store.recent("MOTE-001", 2).len(), 2);
        assert!(store.recent("MOTE-404", 5).is_empty());
    }

    #[test]
    fn test_global_buffer_spans_motes() {
        let store = ReadingStore::new(100, 4);
        store.append(reading("MOTE-001", 0));
        store.append(reading("MOTE-002", 1));
        store.append(reading("MOTE-001", 2));
        store.append(reading("MOTE-002", 3));
        store.append(reading("MOTE-001", 4));

        let all = store.all_recent(10);
        assert_eq!(all.len(), 4);
        assert_eq!(all.first().unwrap().pm25, 1.0);
        assert_eq!(all.last().unwrap().pm25, 4.0);
        assert_eq!(store.mote_count(), 2);
    }
}
