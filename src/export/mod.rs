//! Snapshot export surface for external consumers
//!
//! Persistence and visualization collaborators poll these structures; the
//! field names are the contract, the encoding is theirs to choose.

use serde::{Deserialize, Serialize};

use crate::alerts::Alert;
use crate::analysis::{SafetyStatus, StatSnapshot};
use crate::motes::{Location, Reading};

/// One mote's cell in the pollution map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollutionCell {
    /// Mote identifier
    pub mote_id: String,
    /// Mote position
    pub location: Location,
    /// Latest rolling-average classification for the mote
    pub status: SafetyStatus,
}

/// Serializable view of the whole pipeline at one instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// Most recent readings across all motes, newest last
    pub readings: Vec<Reading>,
    /// Global rolling statistics
    pub statistics: StatSnapshot,
    /// Per-mote location and safety status
    pub pollution_map: Vec<PollutionCell>,
    /// Most recent alerts, newest last
    pub alerts: Vec<Alert>,
}

impl SystemSnapshot {
    /// Encode the snapshot as pretty-printed JSON.
    ///
    /// Convenience for text-based collaborators; binary consumers can
    /// serialize the structure themselves.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::GLOBAL_SCOPE;

    #[test]
    fn test_snapshot_serializes_with_contract_fields() {
        let snapshot = SystemSnapshot {
            readings: vec![],
            statistics: StatSnapshot::empty(GLOBAL_SCOPE),
            pollution_map: vec![PollutionCell {
                mote_id: "MOTE-001".to_string(),
                location: Location { x: 3.0, y: 4.0 },
                status: SafetyStatus::Safe,
            }],
            alerts: vec![],
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("readings").is_some());
        assert!(json.get("statistics").is_some());
        assert!(json.get("pollution_map").is_some());
        assert!(json.get("alerts").is_some());

        let cell = &json["pollution_map"][0];
        assert_eq!(cell["mote_id"], "MOTE-001");
        assert_eq!(cell["location"]["x"], 3.0);
        assert_eq!(cell["status"], "Safe");

        let text = snapshot.to_json().unwrap();
        let parsed: SystemSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.pollution_map.len(), 1);
    }
}
