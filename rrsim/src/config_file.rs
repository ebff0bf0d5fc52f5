//! Configuration file loading
//!
//! Simulation configurations are stored as JSON:
//!
//! ```text
//! {
//!   "mode": "multiple",
//!   "time_quantum": 2,
//!   "context_switch_time": 1,
//!   "processes": [
//!     { "arrival_time": 0, "bursts": [3, 2], "ios": [4] },
//!     { "arrival_time": 1, "bursts": [5] }
//!   ]
//! }
//! ```

use sim_engine::{ConfigError, SimulationConfig};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read config: {0}")]
    Io(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(#[from] ConfigError),
}

/// Loads simulation configurations from disk.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<SimulationConfig, ConfigLoadError> {
        let data = fs::read_to_string(path.as_ref())
            .map_err(|err| ConfigLoadError::Io(err.to_string()))?;
        Self::load_from_str(&data)
    }

    pub fn load_from_str(data: &str) -> Result<SimulationConfig, ConfigLoadError> {
        let config: SimulationConfig =
            serde_json::from_str(data).map_err(|err| ConfigLoadError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::BurstMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "mode": "multiple",
                "time_quantum": 2,
                "context_switch_time": 1,
                "processes": [
                    {{ "arrival_time": 0, "bursts": [3, 2], "ios": [4] }},
                    {{ "bursts": [5] }}
                ]
            }}"#
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.mode, BurstMode::Multiple);
        assert_eq!(config.time_quantum, 2);
        assert_eq!(config.processes.len(), 2);
        assert_eq!(config.processes[1].arrival_time, 0);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::load_from_path(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigLoadError::Io(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = ConfigLoader::load_from_str("{ \"time_quantum\": ");
        assert!(matches!(result, Err(ConfigLoadError::Parse(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result =
            ConfigLoader::load_from_str(r#"{ "time_quantum": 0, "processes": [{ "bursts": [1] }] }"#);
        assert!(matches!(
            result,
            Err(ConfigLoadError::Invalid(ConfigError::ZeroQuantum))
        ));
    }
}
