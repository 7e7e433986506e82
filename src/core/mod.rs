//! Core pipeline - simulation state, events and the sampling orchestrator

mod event_bus;
mod orchestrator;

pub use event_bus::{Event, EventBus, EventPayload, EventType};
pub use orchestrator::Orchestrator;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationState {
    /// Constructed, not yet started
    Idle,
    /// Tick loop active
    Running,
    /// Finished or stopped; terminal
    Stopped,
}
