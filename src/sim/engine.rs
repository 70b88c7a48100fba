//! Simulation engine that advances every station one hour at a time.

use rand::Rng;

use crate::scenario::{ScenarioModel, Station};

use super::diurnal::{activity_at, bias_at};
use super::types::{FlowRecord, HourlyFlow, StationState};
use super::window::SimWindow;

/// Lower bound of the per-station, per-hour volume multiplier.
pub const VARIABILITY_MIN: f64 = 0.75;
/// Upper bound (exclusive) of the per-station, per-hour volume multiplier.
pub const VARIABILITY_MAX: f64 = 1.25;

/// Share of the activity scale every station keeps regardless of size.
const BASE_SCALE: f64 = 0.55;
/// Share of the activity scale proportional to relative capacity.
const CAPACITY_SCALE: f64 = 0.45;

/// Rounds to the nearest integer with halves going up (`-2.5` -> `-2`).
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Activity scale for a station relative to the largest station in the run.
pub fn capacity_scale(capacity: u32, max_capacity: u32) -> f64 {
    if max_capacity == 0 {
        return BASE_SCALE;
    }
    BASE_SCALE + CAPACITY_SCALE * (f64::from(capacity) / f64::from(max_capacity))
}

/// Advances one station by one hour.
///
/// Draws a trip volume from the diurnal curves, splits it into entries and
/// exits by the hour's net bias, then enforces dock bounds: exits are capped
/// by the bikes present first, entries by the free docks left after those
/// exits. The returned state always satisfies `0 <= bikes <= capacity`.
///
/// # Arguments
///
/// * `capacity` - Total docks at the station
/// * `state` - Occupancy before this hour
/// * `hour` - Absolute hour index; curves are looked up at `hour % 24`
/// * `scale` - Result of [`capacity_scale`] for this station
/// * `variability` - Volume multiplier drawn from `[0.75, 1.25)`
pub fn step(
    capacity: u32,
    state: StationState,
    hour: usize,
    scale: f64,
    variability: f64,
) -> (StationState, HourlyFlow) {
    let activity = activity_at(hour);
    let bias = bias_at(hour);
    let capacity = i64::from(capacity);
    let bikes = i64::from(state.bikes).min(capacity);

    let total = (round_half_up(activity * scale * capacity as f64 * variability) as i64).max(0);
    let desired_net = round_half_up(total as f64 * bias) as i64;
    let net = desired_net.clamp(-total, total);

    // the split can push one side below zero when total is 0 or 1
    let entries = round_half_up((total + net) as f64 / 2.0) as i64;
    let exits = total - entries;
    let entries = entries.max(0);
    let exits = exits.max(0);

    let exits = exits.min(bikes);
    let after_exits = bikes - exits;
    let entries = entries.min(capacity - after_exits);

    let next = StationState {
        bikes: (after_exits + entries) as u32,
    };
    let flow = HourlyFlow {
        entries: entries as u32,
        exits: exits as u32,
    };
    (next, flow)
}

/// Simulation engine owning the stations, their running occupancy, and the
/// random source.
///
/// Stations are advanced in their scenario order within every hour, all
/// drawing from the single injected `rng`, so a seeded generator gives
/// byte-identical output across runs.
pub struct Engine<R: Rng> {
    stations: Vec<Station>,
    states: Vec<StationState>,
    scales: Vec<f64>,
    window: SimWindow,
    rng: R,
}

impl<R: Rng> Engine<R> {
    /// Creates an engine with every station at its initial occupancy.
    ///
    /// # Arguments
    ///
    /// * `model` - Validated scenario; stations are emitted in its order
    /// * `window` - Time span to simulate
    /// * `rng` - Random source for the variability draws
    pub fn new(model: &ScenarioModel, window: SimWindow, rng: R) -> Self {
        let max_capacity = model.max_capacity();
        let stations = model.stations.clone();
        let states = stations
            .iter()
            .map(|s| StationState {
                bikes: s.initial_bikes.min(s.capacity),
            })
            .collect();
        let scales = stations
            .iter()
            .map(|s| capacity_scale(s.capacity, max_capacity))
            .collect();
        Self {
            stations,
            states,
            scales,
            window,
            rng,
        }
    }

    /// Advances every station through hour index `hour` and returns one
    /// record per station, in station order.
    pub fn step(&mut self, hour: usize) -> Vec<FlowRecord> {
        let timestamp = self.window.timestamp(hour);
        let mut records = Vec::with_capacity(self.stations.len());

        for ((station, state), scale) in self
            .stations
            .iter()
            .zip(self.states.iter_mut())
            .zip(self.scales.iter())
        {
            let variability = self.rng.random_range(VARIABILITY_MIN..VARIABILITY_MAX);
            let (next, flow) = step(station.capacity, *state, hour, *scale, variability);
            *state = next;

            records.push(FlowRecord {
                station_id: station.id.clone(),
                station_name: station.name.clone(),
                timestamp,
                entries: flow.entries,
                exits: flow.exits,
            });
        }

        records
    }

    /// Runs every hour of the window and returns all records, hour-major.
    pub fn run(&mut self) -> Vec<FlowRecord> {
        let hours = self.window.hours();
        let mut records = Vec::with_capacity(hours.len() * self.stations.len());
        for hour in hours {
            records.extend(self.step(hour));
        }
        records
    }

    /// Current occupancy of every station, in station order.
    pub fn states(&self) -> &[StationState] {
        &self.states
    }
}
