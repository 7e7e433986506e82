// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/dustgrid-rs

//! Sampling orchestrator - drives tick waves across all motes

use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use futures::future::join_all;
use rand::prelude::*;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::{EventBus, SimulationState};
use crate::alerts::{AlertClassifier, AlertLog};
use crate::analysis::{SafetyStatus, StatisticsEngine};
use crate::config::Config;
use crate::export::{PollutionCell, SystemSnapshot};
use crate::motes::{Location, Mote};
use crate::store::ReadingStore;

// Waves between periodic status log lines
const STATUS_EVERY_WAVES: u64 = 5;

// Snapshot export defaults
const SNAPSHOT_READINGS: usize = 50;
const SNAPSHOT_ALERTS: usize = 10;

/// Drives the whole pipeline: once per sampling interval every mote
/// generates a reading on its own task (one wave), the wave is joined,
/// then each new reading flows through statistics and classification
/// sequentially so the alert log stays in timestamp order.
pub struct Orchestrator {
    config: Arc<Config>,
    store: Arc<ReadingStore>,
    stats: Arc<StatisticsEngine>,
    classifier: AlertClassifier,
    alert_log: Arc<AlertLog>,
    event_bus: Arc<EventBus>,
    motes: RwLock<Vec<Arc<Mutex<Mote>>>>,
    state: RwLock<SimulationState>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Orchestrator {
    /// Build the pipeline from a validated configuration.
    ///
    /// Configuration problems surface here, before the run starts; nothing
    /// in the tick path can fail afterwards.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        let store = Arc::new(ReadingStore::new(
            config.store.per_mote_retention,
            config.store.global_retention,
        ));
        let stats = Arc::new(StatisticsEngine::new(
            Arc::clone(&store),
            config.thresholds,
            config.store.stats_window,
        ));
        let classifier = AlertClassifier::new(config.thresholds);
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            config,
            store,
            stats,
            classifier,
            alert_log: Arc::new(AlertLog::new()),
            event_bus: Arc::new(EventBus::new(1024)),
            motes: RwLock::new(Vec::new()),
            state: RwLock::new(SimulationState::Idle),
            shutdown_tx,
        })
    }

    /// Shared reading store
    pub fn store(&self) -> Arc<ReadingStore> {
        Arc::clone(&self.store)
    }

    /// Shared statistics engine
    pub fn stats(&self) -> Arc<StatisticsEngine> {
        Arc::clone(&self.stats)
    }

    /// Shared alert history
    pub fn alert_log(&self) -> Arc<AlertLog> {
        Arc::clone(&self.alert_log)
    }

    /// Shared event bus for external subscribers
    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    /// Current lifecycle state
    pub async fn state(&self) -> SimulationState {
        *self.state.read().await
    }

    /// Run the simulation: Idle → Running, tick until the configured
    /// duration elapses or [`stop`](Self::stop) is called, then → Stopped.
    ///
    /// Late ticks are skipped rather than queued, and cancellation is only
    /// observed at tick boundaries, so an in-flight wave always completes.
    pub async fn run(&self) -> Result<()> {
        {
            let mut state = self.state.write().await;
            if *state != SimulationState::Idle {
                bail!("simulation already started");
            }
            *state = SimulationState::Running;
        }
        self.event_bus
            .publish_state_change(SimulationState::Idle, SimulationState::Running);

        self.spawn_motes().await;

        let sim = &self.config.simulation;
        info!(
            "Simulation started: {} motes, interval {:.1}s, duration {}",
            sim.num_motes,
            sim.sampling_interval_secs,
            match sim.duration_secs {
                Some(d) => format!("{:.1}s", d),
                None => "until stopped".to_string(),
            }
        );

        let mut ticker = interval(Duration::from_secs_f64(sim.sampling_interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let started = Instant::now();
        let limit = sim.duration_secs.map(Duration::from_secs_f64);
        let mut shutdown = self.shutdown_tx.subscribe();
        let mut waves: u64 = 0;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(limit) = limit {
                        if started.elapsed() >= limit {
                            break;
                        }
                    }
                    self.run_wave(waves).await;
                    waves += 1;
                    if waves % STATUS_EVERY_WAVES == 0 {
                        self.log_status();
                    }
                }
                _ = shutdown.recv() => {
                    debug!("stop requested, finishing run");
                    break;
                }
            }
        }

        {
            let mut state = self.state.write().await;
            *state = SimulationState::Stopped;
        }
        self.event_bus
            .publish_state_change(SimulationState::Running, SimulationState::Stopped);
        self.log_summary(waves);
        Ok(())
    }

    /// Request cooperative cancellation. Idempotent; safe to call from any
    /// task at any time. The current wave finishes before the state moves
    /// to Stopped.
    pub fn stop(&self) {
        // send only fails when the run already exited
        let _ = self.shutdown_tx.send(());
    }

    /// Serializable view of the pipeline for external persistence and
    /// visualization collaborators.
    pub async fn snapshot(&self) -> SystemSnapshot {
        let motes = self.motes.read().await;
        let mut pollution_map = Vec::with_capacity(motes.len());
        for mote in motes.iter() {
            let mote = mote.lock().await;
            let status = self
                .stats
                .snapshot(mote.id())
                .map(|s| s.status)
                .unwrap_or(SafetyStatus::Safe);
            pollution_map.push(PollutionCell {
                mote_id: mote.id().to_string(),
                location: mote.location(),
                status,
            });
        }

        SystemSnapshot {
            readings: self.store.all_recent(SNAPSHOT_READINGS),
            statistics: self.stats.global_snapshot(),
            pollution_map,
            alerts: self.alert_log.recent(SNAPSHOT_ALERTS),
        }
    }

    async fn spawn_motes(&self) {
        let sim = &self.config.simulation;
        let mut seeder = match sim.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut motes = self.motes.write().await;
        motes.clear();
        for i in 0..sim.num_motes {
            let location = Location {
                x: seeder.gen_range(0.0..sim.area_size),
                y: seeder.gen_range(0.0..sim.area_size),
            };
            let base_pollution = seeder.gen_range(0.0..0.8);
            let mote = Mote::new(
                &format!("MOTE-{:03}", i + 1),
                location,
                base_pollution,
                sim.spike_probability,
                seeder.gen(),
            );
            debug!("Spawned mote {} at ({:.1}, {:.1})", mote.id(), location.x, location.y);
            motes.push(Arc::new(Mutex::new(mote)));
        }
    }

    /// One tick wave: generate + append in parallel, then classify
    /// sequentially in mote order.
    async fn run_wave(&self, wave: u64) {
        let now = Utc::now();
        let motes = self.motes.read().await;

        let tasks: Vec<_> = motes
            .iter()
            .map(|mote| {
                let mote = Arc::clone(mote);
                let store = Arc::clone(&self.store);
                tokio::spawn(async move {
                    let reading = mote.lock().await.generate_reading(now);
                    store.append(reading.clone());
                    reading
                })
            })
            .collect();

        let mut readings = Vec::with_capacity(tasks.len());
        for result in join_all(tasks).await {
            match result {
                Ok(reading) => readings.push(reading),
                // a failed mote degrades its own snapshot, never the wave
                Err(e) => warn!("mote task failed in wave {}: {}", wave, e),
            }
        }

        for reading in readings {
            self.stats.update(&reading.mote_id);
            self.event_bus.publish_reading(reading.clone());
            if let Some(alert) = self.classifier.classify(&reading) {
                info!("{}", alert.message);
                self.alert_log.record(alert.clone());
                self.event_bus.publish_alert(alert);
            }
        }
    }

    fn log_status(&self) {
        let global = self.stats.global_snapshot();
        info!(
            "readings={} avg_pm25={:.1} avg_pm10={:.1} max_pm25={:.1} max_pm10={:.1} alerts={}",
            self.store.total_appended(),
            global.avg_pm25,
            global.avg_pm10,
            global.max_pm25,
            global.max_pm10,
            self.alert_log.len(),
        );
    }

    fn log_summary(&self, waves: u64) {
        let global = self.stats.global_snapshot();
        info!(
            "Simulation stopped after {} waves: {} readings, {} alerts, peak pm25={:.1} pm10={:.1}",
            waves,
            self.store.total_appended(),
            self.alert_log.len(),
            global.max_pm25,
            global.max_pm10,
        );
        for (severity, count) in self.alert_log.count_by_severity() {
            info!("  {} alerts: {}", severity, count);
        }
    }
}
