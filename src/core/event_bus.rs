// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/dustgrid-rs

//! Event bus for inter-component communication

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::SimulationState;
use crate::alerts::Alert;
use crate::motes::Reading;

/// Event types in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventType {
    /// A mote produced a reading
    Reading,
    /// A reading crossed a safety threshold
    Alert,
    /// The simulation changed lifecycle state
    StateChange,
}

/// Generic event wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic event id
    pub id: u64,
    /// Kind of event
    pub event_type: EventType,
    /// When the event was published
    pub timestamp: DateTime<Utc>,
    /// Event contents
    pub payload: EventPayload,
}

/// Payload carried by an [`Event`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    /// New reading
    Reading(Reading),
    /// New alert
    Alert(Alert),
    /// Lifecycle transition
    StateChange {
        /// Previous state
        from: SimulationState,
        /// New state
        to: SimulationState,
    },
}

/// Central bus for pub/sub communication with external consumers
pub struct EventBus {
    reading_tx: broadcast::Sender<Reading>,
    alert_tx: broadcast::Sender<Alert>,
    event_tx: broadcast::Sender<Event>,
    event_counter: std::sync::atomic::AtomicU64,
}

impl EventBus {
    /// Create a bus whose channels buffer up to `capacity` events.
    pub fn new(capacity: usize) -> Self {
        let (reading_tx, _) = broadcast::channel(capacity);
        let (alert_tx, _) = broadcast::channel(capacity);
        let (event_tx, _) = broadcast::channel(capacity);

        Self {
            reading_tx,
            alert_tx,
            event_tx,
            event_counter: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Publish a new reading to subscribers.
    pub fn publish_reading(&self, reading: Reading) {
        let _ = self.reading_tx.send(reading.clone());
        self.publish_event(EventType::Reading, EventPayload::Reading(reading));
    }

    /// Publish a new alert to subscribers.
    pub fn publish_alert(&self, alert: Alert) {
        let _ = self.alert_tx.send(alert.clone());
        self.publish_event(EventType::Alert, EventPayload::Alert(alert));
    }

    /// Publish a lifecycle transition.
    pub fn publish_state_change(&self, from: SimulationState, to: SimulationState) {
        self.publish_event(
            EventType::StateChange,
            EventPayload::StateChange { from, to },
        );
    }

    fn publish_event(&self, event_type: EventType, payload: EventPayload) {
        let id = self
            .event_counter
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let event = Event {
            id,
            event_type,
            timestamp: Utc::now(),
            payload,
        };
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to the reading stream.
    pub fn subscribe_readings(&self) -> broadcast::Receiver<Reading> {
        self.reading_tx.subscribe()
    }

    /// Subscribe to the alert stream.
    pub fn subscribe_alerts(&self) -> broadcast::Receiver<Alert> {
        self.alert_tx.subscribe()
    }

    /// Subscribe to the combined event stream.
    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }
}
