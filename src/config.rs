//! TOML-based application configuration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Upper bound on `simulation.max_days` accepted by validation.
const MAX_DAYS_CEILING: u32 = 366;

/// Top-level application configuration parsed from TOML.
///
/// All fields have defaults. Load from TOML with
/// [`AppConfig::from_toml_file`] or use [`AppConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Where scenario documents live.
    #[serde(default)]
    pub scenarios: ScenariosConfig,
    /// Random source and request limits.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Log filter for the binary.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scenario document location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenariosConfig {
    /// Directory holding `<id>.json` scenario documents.
    pub dir: PathBuf,
}

impl Default for ScenariosConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("scenarios"),
        }
    }
}

/// Random source and request limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Fixed seed; `None` draws a fresh seed from the OS on every run.
    pub seed: Option<u64>,
    /// Largest `days` value a generation request may ask for.
    pub max_days: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_days: 30,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing-subscriber` env-filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn,bikeshare_sim=info".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.max_days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl AppConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.scenarios.dir.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "scenarios.dir".into(),
                message: "must not be empty".into(),
            });
        }

        let max_days = self.simulation.max_days;
        if max_days == 0 || max_days > MAX_DAYS_CEILING {
            errors.push(ConfigError {
                field: "simulation.max_days".into(),
                message: format!("must be in [1, {MAX_DAYS_CEILING}], got {max_days}"),
            });
        }

        if self.logging.filter.trim().is_empty() {
            errors.push(ConfigError {
                field: "logging.filter".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }
}
