//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use bikeshare_sim::scenario::{ScenarioModel, ScenarioStore, Station};

/// Fixed "now" used by every test (mid-afternoon UTC).
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 15, 20, 0).unwrap()
}

/// Midnight UTC of [`fixed_now`].
pub fn fixed_midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap()
}

/// Deterministic random source.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Directory of the bundled sample scenarios.
pub fn scenarios_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

/// Store over the bundled sample scenarios.
pub fn sample_store() -> ScenarioStore {
    ScenarioStore::new(scenarios_dir())
}

/// One 20-dock station starting with 10 bikes.
pub fn single_station() -> ScenarioModel {
    ScenarioModel::from_stations("single", vec![Station::new("S1", 20).with_initial_bikes(10)])
}

/// Two 20-dock stations, one empty and one full.
pub fn empty_and_full() -> ScenarioModel {
    ScenarioModel::from_stations(
        "extremes",
        vec![
            Station::new("empty", 20).with_initial_bikes(0),
            Station::new("full", 20).with_initial_bikes(20),
        ],
    )
}
