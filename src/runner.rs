//! In-process generation: load a scenario, simulate it, and aggregate the
//! records into the report handed to callers.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{info, info_span};

use crate::aggregate::{StationAggregate, aggregate};
use crate::error::{Error, Result};
use crate::io::flow_csv::serialize_timestamp;
use crate::scenario::{ScenarioModel, ScenarioStore, ScenarioSummary};
use crate::sim::engine::Engine;
use crate::sim::types::FlowRecord;
use crate::sim::window::SimWindow;

/// A caller's request for generated history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Scenario identifier, resolved through a [`ScenarioStore`].
    pub scenario: String,
    /// Whole days of history to generate.
    pub days: u32,
}

impl GenerationRequest {
    pub fn new(scenario: impl Into<String>, days: u32) -> Self {
        Self {
            scenario: scenario.into(),
            days,
        }
    }

    /// Checks the request against the service limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] for a blank scenario or `days` outside
    /// `[1, max_days]`.
    pub fn validate(&self, max_days: u32) -> Result<()> {
        if self.scenario.trim().is_empty() {
            return Err(Error::Usage("parameter `scenario` is required".to_string()));
        }
        if self.days == 0 || self.days > max_days {
            return Err(Error::Usage(format!(
                "parameter `days` must be an integer between 1 and {max_days}, got {}",
                self.days
            )));
        }
        Ok(())
    }
}

/// First and last record timestamps of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    #[serde(serialize_with = "serialize_timestamp")]
    pub start: DateTime<Utc>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub end: DateTime<Utc>,
    pub days: u32,
}

/// Everything a caller needs to display one generated scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub scenario: ScenarioSummary,
    /// `None` exactly when no records were produced.
    pub range: Option<DateRange>,
    pub stations: Vec<StationAggregate>,
}

/// Simulates `days` days of hourly flows for every station in `model`,
/// ending with the UTC day containing `now`.
///
/// Returns `days * 24 * stations` records, hour-major.
///
/// # Errors
///
/// Returns [`Error::Usage`] if `days` is zero and [`Error::Generation`] if
/// the window cannot be represented.
pub fn simulate<R: Rng>(
    model: &ScenarioModel,
    days: u32,
    now: DateTime<Utc>,
    rng: R,
) -> Result<Vec<FlowRecord>> {
    let window = SimWindow::ending_on(now, days)?;
    let mut engine = Engine::new(model, window, rng);
    let records = engine.run();
    info!(
        scenario = %model.id,
        days,
        stations = model.stations.len(),
        records = records.len(),
        start = %window.start,
        "simulated flows"
    );
    Ok(records)
}

/// Aggregates `records` into the caller-facing report.
pub fn build_report(model: &ScenarioModel, records: &[FlowRecord], days: u32) -> GenerationReport {
    let start = records.iter().map(|r| r.timestamp).min();
    let end = records.iter().map(|r| r.timestamp).max();
    let range = start.zip(end).map(|(start, end)| DateRange { start, end, days });

    GenerationReport {
        scenario: model.summary(),
        range,
        stations: aggregate(model, records, days),
    }
}

/// Handles one generation request end to end.
///
/// # Errors
///
/// Returns [`Error::Usage`] for an out-of-range request,
/// [`Error::ScenarioNotFound`] / [`Error::ScenarioInvalid`] when the scenario
/// cannot be loaded, and [`Error::Generation`] if simulation fails.
pub fn generate<R: Rng>(
    store: &ScenarioStore,
    request: &GenerationRequest,
    max_days: u32,
    now: DateTime<Utc>,
    rng: R,
) -> Result<GenerationReport> {
    let _span = info_span!("generate", scenario = %request.scenario, days = request.days).entered();

    request.validate(max_days)?;
    let model = store.load(&request.scenario)?;
    let records = simulate(&model, request.days, now, rng)?;
    Ok(build_report(&model, &records, request.days))
}
