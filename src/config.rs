//! Session configuration.
//!
//! Loaded from a YAML file, then overridden by `Q_GRID_*` environment
//! variables. Missing keys fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::ir::{DEFAULT_QUBITS, MAX_QUBITS, MIN_QUBITS};
use crate::results::SIMULATION_SHOTS;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Settings for one editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Base URL of the simulator service.
    #[serde(default = "default_simulator_url")]
    pub simulator_url: String,

    /// Shots the simulator is expected to run, for discrepancy reporting.
    #[serde(default = "default_shots")]
    pub shots: u64,

    /// Wire count of a fresh circuit.
    #[serde(default = "default_initial_qubits")]
    pub initial_qubits: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_simulator_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_shots() -> u64 {
    SIMULATION_SHOTS
}

fn default_initial_qubits() -> usize {
    DEFAULT_QUBITS
}

fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            simulator_url: default_simulator_url(),
            shots: default_shots(),
            initial_qubits: default_initial_qubits(),
            timeout_seconds: default_timeout(),
            log_level: default_log_level(),
        }
    }
}

impl SessionConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml_str(&contents)
    }

    /// Applies `Q_GRID_*` environment overrides. Unparsable numbers are ignored.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("Q_GRID_SIMULATOR_URL") {
            self.simulator_url = url;
        }
        if let Some(val) = var("Q_GRID_SHOTS").and_then(|v| v.parse().ok()) {
            self.shots = val;
        }
        if let Some(val) = var("Q_GRID_INITIAL_QUBITS").and_then(|v| v.parse().ok()) {
            self.initial_qubits = val;
        }
        if let Some(val) = var("Q_GRID_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.timeout_seconds = val;
        }
        if let Some(level) = var("Q_GRID_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_QUBITS..=MAX_QUBITS).contains(&self.initial_qubits) {
            return Err(ConfigError::ValidationError(format!(
                "initial_qubits must be between {MIN_QUBITS} and {MAX_QUBITS}, got {}",
                self.initial_qubits
            )));
        }
        if self.shots == 0 {
            return Err(ConfigError::ValidationError(
                "shots must be greater than 0".to_string(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.simulator_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "simulator_url cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shots, 200);
        assert_eq!(config.initial_qubits, 4);
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let config = SessionConfig::from_yaml_str(
            "simulator_url: http://sim.local:8080\ninitial_qubits: 2\n",
        )
        .unwrap();
        assert_eq!(config.simulator_url, "http://sim.local:8080");
        assert_eq!(config.initial_qubits, 2);
        assert_eq!(config.shots, SIMULATION_SHOTS);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_yaml_rejects_out_of_range_qubits() {
        let err = SessionConfig::from_yaml_str("initial_qubits: 11\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_yaml_parse_error() {
        let err = SessionConfig::from_yaml_str("shots: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SessionConfig::from_file("/nonexistent/q-grid.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("Q_GRID_SIMULATOR_URL", "http://other:9000"),
            ("Q_GRID_SHOTS", "1024"),
            ("Q_GRID_TIMEOUT", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = SessionConfig::default();
        config.apply_vars(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.simulator_url, "http://other:9000");
        assert_eq!(config.shots, 1024);
        assert_eq!(config.timeout_seconds, 30);
    }
}
