//! Configuration: settings state and persisted stores

mod settings;
mod store;

pub use settings::{
    default_settings, keys, ConfigObserver, DurabilityConfig, LoadReport, Settings,
    FLOAT_EPSILON, MIN_MULTIPLIER, RESTORE_COST_RANGE,
};
pub use store::{MemoryStore, SavedValue, SettingsStore, TomlStore};

use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Value {value} for '{key}' is out of range ({expected})")]
    OutOfRange {
        key: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("Saved value for '{key}' has the wrong type (expected {expected})")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}
