//! Core simulation types: per-station state, hourly flows, and emitted records.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Running occupancy of one station during a run.
///
/// Always within `[0, capacity]` of the station it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationState {
    pub bikes: u32,
}

/// Bikes moved at one station during one hour, after capacity enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HourlyFlow {
    /// Bikes returned to the station.
    pub entries: u32,
    /// Bikes taken from the station.
    pub exits: u32,
}

impl HourlyFlow {
    /// Total trips touching the station this hour.
    pub fn trips(&self) -> u32 {
        self.entries + self.exits
    }
}

/// One emitted `(station, hour)` fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRecord {
    pub station_id: String,
    pub station_name: String,
    /// Start of the hour, UTC.
    pub timestamp: DateTime<Utc>,
    pub entries: u32,
    pub exits: u32,
}

impl FlowRecord {
    /// Entries and exits of this record.
    pub fn flow(&self) -> HourlyFlow {
        HourlyFlow {
            entries: self.entries,
            exits: self.exits,
        }
    }
}
