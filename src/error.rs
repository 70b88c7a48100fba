//! Crate-wide error type.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure that stops a load, generation, or export.
///
/// Capacity clamping inside a run is never reported here: it is part of
/// the normal hourly transition.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed command-line arguments or request parameters.
    #[error("usage error: {0}")]
    Usage(String),

    /// The scenario identifier does not resolve to a document.
    #[error("scenario `{id}` not found at {}", .path.display())]
    ScenarioNotFound {
        /// Requested identifier.
        id: String,
        /// Path that was probed.
        path: PathBuf,
    },

    /// The scenario document failed schema checks.
    #[error("scenario `{id}` is invalid: {}", IssueList(.issues))]
    ScenarioInvalid {
        /// Scenario identifier.
        id: String,
        /// Every problem found in the document.
        issues: Vec<ScenarioIssue>,
    },

    /// The simulation or aggregation step could not complete.
    #[error("generation failed: {0}")]
    Generation(String),

    /// Invalid application configuration.
    #[error("{}", IssueList(.0))]
    Config(Vec<ConfigError>),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One validation problem in a scenario document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioIssue {
    /// Field path, e.g. `parking_points[2].total_stands`.
    pub path: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ScenarioIssue {
    pub(crate) fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ScenarioIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at `{}`: {}", self.path, self.message)
    }
}

struct IssueList<'a, T>(&'a [T]);

impl<T: fmt::Display> fmt::Display for IssueList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}
