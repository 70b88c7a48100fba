//! Replays flow records into per-station occupancy history and a 24-hour
//! average demand profile.
//!
//! Replay is independent of the engine's running state: it starts from the
//! scenario's initial occupancy and applies the same clamp rule, so for a
//! given record sequence it reaches the same occupancy at every hour.

use std::collections::HashMap;

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::io::flow_csv::serialize_timestamp;
use crate::scenario::{Location, ScenarioModel, Station};
use crate::sim::diurnal::HOURS_PER_DAY;
use crate::sim::types::{FlowRecord, HourlyFlow};

/// At most this many trailing days feed the demand profile.
pub const PROFILE_MAX_DAYS: u32 = 7;

/// One replayed hour at a station.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Entries and exits as recorded, written inline.
    #[serde(flatten)]
    pub flow: HourlyFlow,
    /// Occupancy after this hour's exits and entries.
    pub bikes_available: u32,
}

/// Average trips for one hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyDemand {
    pub hour: u32,
    /// Mean of `entries + exits`, rounded to two decimals.
    pub average_trips: f64,
}

/// Read-only per-station view built from the record sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationAggregate {
    pub id: String,
    pub name: String,
    pub location: Option<Location>,
    pub capacity: u32,
    pub initial_bikes: u32,
    /// Occupancy after the last replayed record.
    pub bikes_available: u32,
    /// Every replayed record, oldest first.
    pub history: Vec<HistoryEntry>,
    /// Always 24 entries, hours 0 through 23.
    pub hourly_average_demand: Vec<HourlyDemand>,
}

/// Replays `records` (already in timestamp order) against `station`.
///
/// Exits are applied before entries, each clamped to `[0, capacity]`.
pub fn replay<'a>(
    station: &Station,
    records: impl IntoIterator<Item = &'a FlowRecord>,
) -> Vec<HistoryEntry> {
    let capacity = i64::from(station.capacity);
    let mut bikes = i64::from(station.initial_bikes);

    records
        .into_iter()
        .map(|r| {
            let flow = r.flow();
            bikes = (bikes - i64::from(flow.exits)).clamp(0, capacity);
            bikes = (bikes + i64::from(flow.entries)).clamp(0, capacity);
            HistoryEntry {
                timestamp: r.timestamp,
                flow,
                bikes_available: bikes as u32,
            }
        })
        .collect()
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Averages trips per UTC hour of day over the trailing
/// `24 * min(days, 7)` history entries.
///
/// Hours with no observation in the window average to `0`.
pub fn hourly_profile(history: &[HistoryEntry], days: u32) -> Vec<HourlyDemand> {
    let window = (HOURS_PER_DAY * days.min(PROFILE_MAX_DAYS) as usize).min(history.len());
    let trailing = &history[history.len() - window..];

    let mut buckets = [(0_u64, 0_u64); HOURS_PER_DAY];
    for entry in trailing {
        let bucket = &mut buckets[entry.timestamp.hour() as usize];
        bucket.0 += u64::from(entry.flow.trips());
        bucket.1 += 1;
    }

    buckets
        .iter()
        .enumerate()
        .map(|(hour, &(trips, count))| HourlyDemand {
            hour: hour as u32,
            average_trips: if count == 0 {
                0.0
            } else {
                round_cents(trips as f64 / count as f64)
            },
        })
        .collect()
}

/// Builds one aggregate per scenario station, in scenario order.
///
/// Records are stably ordered by timestamp before replay. Records naming a
/// station the scenario does not contain are skipped.
pub fn aggregate(model: &ScenarioModel, records: &[FlowRecord], days: u32) -> Vec<StationAggregate> {
    let mut ordered: Vec<&FlowRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.timestamp);

    let mut by_station: HashMap<&str, Vec<&FlowRecord>> = model
        .stations
        .iter()
        .map(|s| (s.id.as_str(), Vec::new()))
        .collect();
    let mut skipped = 0_usize;
    for record in ordered {
        match by_station.get_mut(record.station_id.as_str()) {
            Some(bucket) => bucket.push(record),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(
            scenario = %model.id,
            skipped,
            "ignored records for stations not in the scenario"
        );
    }

    model
        .stations
        .iter()
        .map(|station| {
            let station_records = by_station.remove(station.id.as_str()).unwrap_or_default();
            let history = replay(station, station_records);
            let hourly_average_demand = hourly_profile(&history, days);
            let bikes_available = history
                .last()
                .map_or(station.initial_bikes, |h| h.bikes_available);
            debug!(
                station = %station.id,
                hours = history.len(),
                bikes_available,
                "aggregated station"
            );
            StationAggregate {
                id: station.id.clone(),
                name: station.name.clone(),
                location: station.location,
                capacity: station.capacity,
                initial_bikes: station.initial_bikes,
                bikes_available,
                history,
                hourly_average_demand,
            }
        })
        .collect()
}
