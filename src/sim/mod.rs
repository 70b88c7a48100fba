//! Hour-by-hour occupancy simulation.

/// Fixed urban commute curves indexed by hour of day.
pub mod diurnal;
pub mod engine;
/// Random source construction.
pub mod rng;
pub mod types;
/// Absolute time span covered by a run.
pub mod window;
