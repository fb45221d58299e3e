//! Runner configuration
//!
//! File-based configuration for the host process: which instruments to
//! subscribe at startup, the exchange they trade on, and the submission
//! timeout handed to the correlator. All fields default so an empty
//! `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Host-process configuration, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Instruments to subscribe when the session opens
    #[serde(default)]
    pub instruments: Vec<String>,

    /// Exchange the instruments trade on
    #[serde(default = "default_exchange")]
    pub exchange_id: String,

    /// How long a submit waits for a terminal order state
    #[serde(default = "default_submit_timeout_ms")]
    pub submit_timeout_ms: u64,
}

fn default_exchange() -> String {
    "DCE".to_string()
}

fn default_submit_timeout_ms() -> u64 {
    5_000
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            instruments: Vec::new(),
            exchange_id: default_exchange(),
            submit_timeout_ms: default_submit_timeout_ms(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Submission timeout as a `Duration`
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert!(config.instruments.is_empty());
        assert_eq!(config.exchange_id, "DCE");
        assert_eq!(config.submit_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_partial_json() {
        let config: RunnerConfig =
            serde_json::from_str(r#"{"instruments": ["c2105"], "submit_timeout_ms": 250}"#)
                .unwrap();
        assert_eq!(config.instruments, vec!["c2105".to_string()]);
        assert_eq!(config.exchange_id, "DCE");
        assert_eq!(config.submit_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_empty_object_is_valid() {
        let config: RunnerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.submit_timeout_ms, 5_000);
    }
}
