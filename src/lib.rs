//! Synthetic bike-share station history: hourly flow simulation bounded by
//! dock capacity, and aggregation into per-station demand profiles.

pub mod aggregate;
pub mod config;
pub mod error;
/// CSV protocol between the generator and its consumers.
pub mod io;
pub mod runner;
pub mod scenario;
/// Simulation engine, diurnal curves, and time window.
pub mod sim;

pub use error::{Error, Result};
