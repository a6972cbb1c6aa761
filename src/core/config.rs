/*!
 * Scheduler Configuration
 *
 * Runtime configuration for aging, queue sizing, and debug reporting
 */

use super::limits::{
    DEFAULT_QUEUE_CAPACITY, DEFAULT_STARVING_AGE, ENV_DEBUG, ENV_QUEUE_CAPACITY,
    ENV_STARVING_AGE, MAX_QUEUE_CAPACITY,
};
use super::types::Age;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    #[diagnostic(code(config::io), help("Check that the file exists and is readable."))]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    #[diagnostic(code(config::parse), help("The file must be a JSON object."))]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value:?}")]
    #[diagnostic(code(config::invalid_value))]
    InvalidValue { key: &'static str, value: String },

    #[error("Starving age must be at least 1")]
    #[diagnostic(
        code(config::zero_starving_age),
        help("An age of 0 would promote every normal job on the first sweep.")
    )]
    ZeroStarvingAge,

    #[error("Queue capacity {0} exceeds maximum ({max})", max = MAX_QUEUE_CAPACITY)]
    #[diagnostic(code(config::queue_capacity))]
    QueueCapacity(usize),
}

/// Schedule configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ScheduleConfig {
    /// Aging sweeps before a normal job is promoted
    pub starving_age: Age,
    /// Slots reserved in each queue at creation
    pub queue_capacity: usize,
    /// Whether debug reports are produced
    pub debug: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            starving_age: DEFAULT_STARVING_AGE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            debug: false,
        }
    }
}

impl ScheduleConfig {
    pub fn with_starving_age(mut self, starving_age: Age) -> Self {
        self.starving_age = starving_age;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Defaults overridden by `SCHED_STARVING_AGE`, `SCHED_QUEUE_CAPACITY`, `SCHED_DEBUG`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = read_env(ENV_STARVING_AGE) {
            config.starving_age = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_STARVING_AGE,
                value: raw.clone(),
            })?;
        }

        if let Some(raw) = read_env(ENV_QUEUE_CAPACITY) {
            config.queue_capacity =
                raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: ENV_QUEUE_CAPACITY,
                    value: raw.clone(),
                })?;
        }

        if let Some(raw) = read_env(ENV_DEBUG) {
            config.debug = parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                key: ENV_DEBUG,
                value: raw,
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starving_age == 0 {
            return Err(ConfigError::ZeroStarvingAge);
        }
        if self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::QueueCapacity(self.queue_capacity));
        }
        Ok(())
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScheduleConfig::default();
        assert_eq!(config.starving_age, DEFAULT_STARVING_AGE);
        assert!(!config.debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_starving_age_rejected() {
        let config = ScheduleConfig::default().with_starving_age(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroStarvingAge)));
    }

    #[test]
    fn test_oversized_capacity_rejected() {
        let config = ScheduleConfig::default().with_queue_capacity(MAX_QUEUE_CAPACITY + 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::QueueCapacity(_))
        ));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ScheduleConfig = serde_json::from_str(r#"{"debug": true}"#).unwrap();
        assert!(config.debug);
        assert_eq!(config.starving_age, DEFAULT_STARVING_AGE);
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
    }
}
