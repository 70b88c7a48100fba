//! Station topology: scenario documents, validation, and lookup by identifier.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result, ScenarioIssue};

/// Geographic position of a station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Scenario document as stored on disk, before validation.
///
/// `parking_points` stays untyped so a mistyped field is reported at its own
/// position rather than failing the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScenarioDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub parking_points: Option<Value>,
}

/// A validated docking station. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Unique identifier within the scenario.
    pub id: String,
    /// Display label, the id when the document gives none.
    pub name: String,
    /// Total docks, always > 0.
    pub capacity: u32,
    /// Occupancy at the start of a run, within `[0, capacity]`.
    pub initial_bikes: u32,
    pub location: Option<Location>,
}

impl Station {
    /// Creates a station starting half full (half rounded up).
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            capacity,
            initial_bikes: default_initial_bikes(capacity),
            location: None,
        }
    }

    /// Overrides the starting occupancy.
    pub fn with_initial_bikes(mut self, initial_bikes: u32) -> Self {
        self.initial_bikes = initial_bikes;
        self
    }
}

/// Display metadata reported alongside generated data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub city: String,
}

/// Validated, read-only station topology.
#[derive(Debug, Clone)]
pub struct ScenarioModel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub city: String,
    pub stations: Vec<Station>,
}

fn default_initial_bikes(capacity: u32) -> u32 {
    capacity.div_ceil(2)
}

fn whole_number(value: f64) -> Option<u32> {
    if value.is_finite() && value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}

impl ScenarioDocument {
    /// Validates every parking point and returns all problems found.
    ///
    /// Returns an empty vector if the document is valid.
    pub fn validate(&self) -> Vec<ScenarioIssue> {
        self.stations().1
    }

    /// Converts the parking points into stations, collecting an issue for
    /// every entry that cannot become one.
    fn stations(&self) -> (Vec<Station>, Vec<ScenarioIssue>) {
        let mut stations = Vec::new();
        let mut issues = Vec::new();

        let points = match &self.parking_points {
            Some(Value::Array(points)) => points,
            Some(_) => {
                issues.push(ScenarioIssue::new(
                    "parking_points",
                    "parking_points must be a list",
                ));
                return (stations, issues);
            }
            None => {
                issues.push(ScenarioIssue::new(
                    "parking_points",
                    "missing list of parking points",
                ));
                return (stations, issues);
            }
        };

        let mut seen = HashSet::new();
        for (index, point) in points.iter().enumerate() {
            let Some(point) = point.as_object() else {
                issues.push(ScenarioIssue::new(
                    format!("parking_points[{index}]"),
                    format!("parking point at position {index} must be an object"),
                ));
                continue;
            };
            let id = point
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.trim().is_empty());
            if let Some(id) = id {
                if !seen.insert(id) {
                    issues.push(ScenarioIssue::new(
                        format!("parking_points[{index}].id"),
                        format!("duplicate parking point id `{id}`"),
                    ));
                }
            }
            match parking_point(index, point) {
                Ok(station) => stations.push(station),
                Err(issue) => issues.push(issue),
            }
        }

        (stations, issues)
    }
}

/// Type-checks one `parking_points` entry, stopping at the first bad field.
fn parking_point(
    index: usize,
    point: &Map<String, Value>,
) -> std::result::Result<Station, ScenarioIssue> {
    let at = |field: &str| format!("parking_points[{index}].{field}");
    let present = |field: &str| point.get(field).filter(|v| !v.is_null());

    let id = point
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            ScenarioIssue::new(
                at("id"),
                format!("parking point at position {index} has no valid id"),
            )
        })?;

    let capacity = point
        .get("total_stands")
        .and_then(Value::as_f64)
        .and_then(whole_number)
        .filter(|&n| n > 0)
        .ok_or_else(|| {
            ScenarioIssue::new(
                at("total_stands"),
                format!("parking point `{id}` must have a positive integer total_stands"),
            )
        })?;

    let initial_bikes = match present("initial_bikes") {
        None => default_initial_bikes(capacity),
        Some(raw) => raw
            .as_f64()
            .and_then(whole_number)
            .filter(|&n| n <= capacity)
            .ok_or_else(|| {
                ScenarioIssue::new(
                    at("initial_bikes"),
                    format!(
                        "parking point `{id}` has initial_bikes {raw}, expected an integer in [0, {capacity}]"
                    ),
                )
            })?,
    };

    let name = match present("name") {
        None => id,
        Some(raw) => raw.as_str().ok_or_else(|| {
            ScenarioIssue::new(
                at("name"),
                format!("parking point `{id}` has a non-text name {raw}"),
            )
        })?,
    };

    let location = present("location")
        .map(Location::deserialize)
        .transpose()
        .map_err(|e| {
            ScenarioIssue::new(
                at("location"),
                format!("parking point `{id}` has an invalid location: {e}"),
            )
        })?;

    Ok(Station {
        id: id.to_string(),
        name: if name.is_empty() { id } else { name }.to_string(),
        capacity,
        initial_bikes,
        location,
    })
}

impl ScenarioModel {
    /// Builds a validated model from a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScenarioInvalid`] listing every offending entry.
    pub fn from_document(id: &str, doc: ScenarioDocument) -> Result<Self> {
        let (stations, issues) = doc.stations();
        if !issues.is_empty() {
            return Err(Error::ScenarioInvalid {
                id: id.to_string(),
                issues,
            });
        }

        Ok(Self {
            id: id.to_string(),
            name: doc
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| id.to_string()),
            description: doc.description.unwrap_or_default(),
            city: doc.city.unwrap_or_default(),
            stations,
        })
    }

    /// Parses and validates a JSON scenario document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScenarioInvalid`] if the JSON is malformed or fails validation.
    pub fn from_json_str(id: &str, json: &str) -> Result<Self> {
        let doc: ScenarioDocument =
            serde_json::from_str(json).map_err(|e| Error::ScenarioInvalid {
                id: id.to_string(),
                issues: vec![ScenarioIssue::new("$", format!("malformed document: {e}"))],
            })?;
        Self::from_document(id, doc)
    }

    /// Builds a model directly from stations, bypassing document parsing.
    pub fn from_stations(id: &str, stations: Vec<Station>) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            city: String::new(),
            stations,
        }
    }

    /// Largest capacity across all stations, 0 when there are none.
    pub fn max_capacity(&self) -> u32 {
        self.stations.iter().map(|s| s.capacity).max().unwrap_or(0)
    }

    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            city: self.city.clone(),
        }
    }
}

/// Resolves scenario identifiers to `<dir>/<id>.json` documents.
#[derive(Debug, Clone)]
pub struct ScenarioStore {
    dir: PathBuf,
}

impl ScenarioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Document path for `id`, or `None` if `id` is not a plain file stem.
    pub fn path_for(&self, id: &str) -> Option<PathBuf> {
        let plain = !id.trim().is_empty()
            && !id.contains(['/', '\\'])
            && id != "."
            && !id.contains("..");
        plain.then(|| self.dir.join(format!("{id}.json")))
    }

    /// Loads and validates the scenario named `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScenarioNotFound`] if no document exists for `id`,
    /// [`Error::ScenarioInvalid`] if it fails to parse or validate, and
    /// [`Error::Io`] for any other read failure.
    pub fn load(&self, id: &str) -> Result<ScenarioModel> {
        let not_found = |path: PathBuf| Error::ScenarioNotFound {
            id: id.to_string(),
            path,
        };
        let path = self
            .path_for(id)
            .ok_or_else(|| not_found(self.dir.join(id)))?;

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found(path)),
            Err(e) => return Err(Error::Io(e)),
        };

        let model = ScenarioModel::from_json_str(id, &raw)?;
        debug!(
            scenario = id,
            stations = model.stations.len(),
            path = %path.display(),
            "loaded scenario"
        );
        Ok(model)
    }
}
